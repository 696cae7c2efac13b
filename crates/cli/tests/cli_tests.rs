use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

/// Runs the binary against a config file that does not exist, so the
/// defaults apply regardless of the user's own settings.
fn livetidy(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("livetidy").unwrap();
    cmd.arg("--config").arg(config_dir.join("config.toml"));
    cmd
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("livetidy")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("capture dates"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("livetidy")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_directory_exit_code() {
    let config = tempdir().unwrap();
    let absent = config.path().join("absent");

    livetidy(config.path())
        .arg("run")
        .arg(&absent)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("directory does not exist"));
}

#[test]
fn test_nothing_to_convert_exit_code() {
    let config = tempdir().unwrap();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    livetidy(config.path())
        .arg("run")
        .arg(dir.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nothing to convert"));

    assert!(dir.path().join("notes.txt").exists());
}

#[test]
fn test_replace_without_convert_is_rejected() {
    let config = tempdir().unwrap();
    let dir = tempdir().unwrap();

    livetidy(config.path())
        .args(["run", "--replace-originals", "--no-convert"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires the conversion phase"));
}

#[test]
fn test_still_without_date_is_left_alone() {
    let config = tempdir().unwrap();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("screenshot.png"), b"not really a png").unwrap();

    livetidy(config.path())
        .args(["run", "--no-convert", "--output", "json"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped_no_date"));

    assert!(dir.path().join("screenshot.png").exists());
}

#[test]
fn test_log_file_is_written_into_folder() {
    let config = tempdir().unwrap();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("screenshot.png"), b"x").unwrap();

    livetidy(config.path())
        .args(["run", "--no-convert", "--log-file"])
        .arg(dir.path())
        .assert()
        .success();

    let logs: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("livetidy_") && name.ends_with(".log"))
        .collect();
    assert_eq!(logs.len(), 1);
    let body = std::fs::read_to_string(dir.path().join(&logs[0])).unwrap();
    assert!(body.contains("screenshot.png"));
}

#[test]
fn test_config_show_prints_defaults() {
    let config = tempdir().unwrap();

    livetidy(config.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("target_extension = \"jpg\""))
        .stdout(predicate::str::contains("Live Photos"));
}

#[test]
fn test_no_recursive_overrides_config_default() {
    let config = tempdir().unwrap();
    let config_path = config.path().join("config.toml");
    std::fs::write(
        &config_path,
        "recursive_default = true\nvideo_probe_program = \"livetidy-no-such-probe\"\n",
    )
    .unwrap();
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("Live Photos")).unwrap();
    std::fs::write(dir.path().join("Live Photos").join("IMG_01.MOV"), b"mov").unwrap();

    // The config default reaches into the sub folder and hits the broken probe.
    livetidy(config.path())
        .args(["run", "--no-convert"])
        .arg(dir.path())
        .assert()
        .code(5);

    livetidy(config.path())
        .args(["run", "--no-convert", "--no-recursive"])
        .arg(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("Live Photos").join("IMG_01.MOV").exists());
}
