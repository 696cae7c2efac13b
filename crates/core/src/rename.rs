use crate::date_resolver::{is_date_prefixed, DateResolution, DateResolver};
use crate::media::{scan_renamable, MediaFile, MediaKind, ScanOptions};
use crate::metadata::{PropertyProvider, VideoMetadataProvider};
use crate::progress::{EventOutcome, Phase, ProgressEvent, ProgressSink};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    Rename { target: PathBuf },
    SkipNoDate,
    SkipAlreadyPrefixed,
}

#[derive(Debug, Clone)]
pub struct PlannedRename {
    pub file: MediaFile,
    pub action: PlannedAction,
}

/// Every date of a phase, resolved before the first file is touched.
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    pub entries: Vec<PlannedRename>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed { to: PathBuf },
    SkippedNoDate,
    SkippedAlreadyPrefixed,
    Failed { target: PathBuf, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameEntry {
    pub original: PathBuf,
    pub kind: MediaKind,
    pub outcome: RenameOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenameReport {
    pub entries: Vec<RenameEntry>,
}

impl RenameReport {
    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, RenameOutcome::Renamed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                RenameOutcome::SkippedNoDate | RenameOutcome::SkippedAlreadyPrefixed
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RenameOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&RenameOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Resolves a date prefix for every renamable file in `dir`.
///
/// Fails with [`crate::PipelineError::VideoMetadata`] as soon as one video
/// cannot be dated; nothing has been renamed at that point.
pub fn plan_renames<P, V>(
    dir: &Path,
    target_extension: &str,
    options: ScanOptions,
    resolver: &DateResolver<P, V>,
) -> Result<RenamePlan>
where
    P: PropertyProvider,
    V: VideoMetadataProvider,
{
    let files = scan_renamable(dir, target_extension, options)?;
    let mut entries = Vec::with_capacity(files.len());

    for file in files {
        let name = file.file_name();
        let action = if is_date_prefixed(&name) {
            PlannedAction::SkipAlreadyPrefixed
        } else {
            match resolver.resolve(&file)? {
                DateResolution::Prefix(prefix) => {
                    let parent = file.path.parent().unwrap_or_else(|| Path::new(""));
                    PlannedAction::Rename {
                        target: parent.join(prefix.prepend_to(&name)),
                    }
                }
                DateResolution::Unavailable => PlannedAction::SkipNoDate,
            }
        };
        entries.push(PlannedRename { file, action });
    }

    Ok(RenamePlan { entries })
}

/// Renames in place. An occupied target fails that file only; existing
/// files are never overwritten.
pub fn apply_renames(plan: RenamePlan, sink: &mut dyn ProgressSink) -> RenameReport {
    let total = plan.entries.len();
    let mut report = RenameReport {
        entries: Vec::with_capacity(total),
    };

    for (i, planned) in plan.entries.into_iter().enumerate() {
        let outcome = match planned.action {
            PlannedAction::SkipNoDate => RenameOutcome::SkippedNoDate,
            PlannedAction::SkipAlreadyPrefixed => RenameOutcome::SkippedAlreadyPrefixed,
            PlannedAction::Rename { target } => rename_one(&planned.file.path, target),
        };

        sink.report(ProgressEvent {
            phase: Phase::Rename,
            index: i + 1,
            total,
            path: planned.file.path.clone(),
            outcome: match &outcome {
                RenameOutcome::Renamed { to } => EventOutcome::Renamed { to: to.clone() },
                RenameOutcome::SkippedNoDate => EventOutcome::SkippedNoDate,
                RenameOutcome::SkippedAlreadyPrefixed => EventOutcome::SkippedAlreadyPrefixed,
                RenameOutcome::Failed { reason, .. } => EventOutcome::Failed {
                    reason: reason.clone(),
                },
            },
        });

        report.entries.push(RenameEntry {
            original: planned.file.path,
            kind: planned.file.kind,
            outcome,
        });
    }

    report
}

pub fn rename_all<P, V>(
    dir: &Path,
    target_extension: &str,
    options: ScanOptions,
    resolver: &DateResolver<P, V>,
    sink: &mut dyn ProgressSink,
) -> Result<RenameReport>
where
    P: PropertyProvider,
    V: VideoMetadataProvider,
{
    let plan = plan_renames(dir, target_extension, options, resolver)?;
    Ok(apply_renames(plan, sink))
}

fn rename_one(original: &Path, target: PathBuf) -> RenameOutcome {
    if target.exists() {
        return RenameOutcome::Failed {
            reason: format!("target already exists: {}", target.display()),
            target,
        };
    }

    match fs::rename(original, &target) {
        Ok(()) => RenameOutcome::Renamed { to: target },
        Err(err) => RenameOutcome::Failed {
            reason: format!(
                "failed to rename {} -> {}: {err}",
                original.display(),
                target.display()
            ),
            target,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use anyhow::bail;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[derive(Default)]
    struct NameKeyed(HashMap<String, String>);

    impl NameKeyed {
        fn with(mut self, name: &str, value: &str) -> Self {
            self.0.insert(name.to_string(), value.to_string());
            self
        }

        fn lookup(&self, path: &Path) -> Option<String> {
            let name = path.file_name()?.to_string_lossy().to_string();
            self.0.get(&name).cloned()
        }
    }

    impl PropertyProvider for NameKeyed {
        fn property(&self, path: &Path, _name: &str) -> Option<String> {
            self.lookup(path)
        }
    }

    impl VideoMetadataProvider for NameKeyed {
        fn encoded_date(&self, path: &Path) -> Result<String> {
            match self.lookup(path) {
                Some(value) => Ok(value),
                None => bail!("no encoded date"),
            }
        }
    }

    fn touch(path: &Path) {
        fs::write(path, b"x").expect("write fixture");
    }

    #[test]
    fn still_with_date_is_prefixed_in_place() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("IMG_01.HEIC"));
        let resolver = DateResolver::new(
            NameKeyed::default().with("IMG_01.HEIC", "2023:05:01 10:15:00"),
            NameKeyed::default(),
        );

        let mut events: Vec<ProgressEvent> = Vec::new();
        let report = rename_all(
            temp.path(),
            "jpg",
            ScanOptions::default(),
            &resolver,
            &mut events,
        )
        .expect("rename should succeed");

        assert_eq!(report.renamed(), 1);
        assert!(temp.path().join("2023-05-01_10-15_IMG_01.HEIC").exists());
        assert!(!temp.path().join("IMG_01.HEIC").exists());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn still_without_date_is_left_alone() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("screenshot.png"));
        let resolver = DateResolver::new(NameKeyed::default(), NameKeyed::default());

        let mut events: Vec<ProgressEvent> = Vec::new();
        let report = rename_all(
            temp.path(),
            "jpg",
            ScanOptions::default(),
            &resolver,
            &mut events,
        )
        .expect("rename should succeed");

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.entries[0].outcome, RenameOutcome::SkippedNoDate);
        assert!(temp.path().join("screenshot.png").exists());
        assert_eq!(events[0].outcome, EventOutcome::SkippedNoDate);
    }

    #[test]
    fn occupied_target_fails_only_that_file() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("a.jpg"));
        touch(&temp.path().join("b.jpg"));
        fs::write(temp.path().join("2023-05-01_10-15_a.jpg"), b"keep").expect("write occupant");
        let resolver = DateResolver::new(
            NameKeyed::default()
                .with("a.jpg", "2023:05:01 10:15:00")
                .with("b.jpg", "2023:05:02 11:00:00"),
            NameKeyed::default(),
        );

        let report = rename_all(
            temp.path(),
            "jpg",
            ScanOptions::default(),
            &resolver,
            &mut Vec::<ProgressEvent>::new(),
        )
        .expect("rename should succeed");

        assert_eq!(report.failed(), 1);
        assert_eq!(report.renamed(), 1);
        assert!(temp.path().join("a.jpg").exists());
        assert_eq!(
            fs::read(temp.path().join("2023-05-01_10-15_a.jpg")).expect("read occupant"),
            b"keep"
        );
        assert!(temp.path().join("2023-05-02_11-00_b.jpg").exists());
    }

    #[test]
    fn unreadable_video_aborts_before_any_rename() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("A_first.jpg"));
        touch(&temp.path().join("CLIP.MP4"));
        let resolver = DateResolver::new(
            NameKeyed::default().with("A_first.jpg", "2023:05:01 10:15:00"),
            NameKeyed::default().with("CLIP.MP4", "not a date"),
        );

        let err = rename_all(
            temp.path(),
            "jpg",
            ScanOptions::default(),
            &resolver,
            &mut Vec::<ProgressEvent>::new(),
        )
        .expect_err("video metadata failure is fatal");

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::VideoMetadata { .. })
        ));
        assert!(temp.path().join("A_first.jpg").exists());
        assert!(temp.path().join("CLIP.MP4").exists());
    }

    #[test]
    fn already_prefixed_files_are_not_prefixed_twice() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("2023-05-01_10-15_IMG_01.HEIC"));
        let resolver = DateResolver::new(
            NameKeyed::default().with("2023-05-01_10-15_IMG_01.HEIC", "2023:05:01 10:15:00"),
            NameKeyed::default(),
        );

        let report = rename_all(
            temp.path(),
            "jpg",
            ScanOptions::default(),
            &resolver,
            &mut Vec::<ProgressEvent>::new(),
        )
        .expect("rename should succeed");

        assert_eq!(
            report.entries[0].outcome,
            RenameOutcome::SkippedAlreadyPrefixed
        );
        assert!(temp.path().join("2023-05-01_10-15_IMG_01.HEIC").exists());
    }

    #[test]
    fn recursive_option_renames_videos_one_level_down() {
        let temp = tempdir().expect("tempdir");
        let live = temp.path().join("Live Photos");
        fs::create_dir_all(&live).expect("create live dir");
        touch(&live.join("IMG_01.MOV"));
        touch(&live.join("IMG_02.HEIC"));
        let resolver = DateResolver::new(
            NameKeyed::default(),
            NameKeyed::default().with("IMG_01.MOV", "2023-05-01 10:15:03 UTC"),
        );

        let report = rename_all(
            temp.path(),
            "jpg",
            ScanOptions {
                recursive: true,
                include_hidden: false,
            },
            &resolver,
            &mut Vec::<ProgressEvent>::new(),
        )
        .expect("rename should succeed");

        assert_eq!(report.entries.len(), 1);
        assert!(live.join("2023-05-01_10-15_IMG_01.MOV").exists());
        assert!(live.join("IMG_02.HEIC").exists());
    }
}
