use crate::collision::DEFAULT_COLLISION_MARKER;
use crate::converter::DEFAULT_CONVERTER_PROGRAM;
use crate::live_photo::DEFAULT_LIVE_PHOTO_DIR;
use crate::video_probe::DEFAULT_VIDEO_PROBE_PROGRAM;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub target_extension: String,
    pub live_photo_dir: String,
    pub collision_marker: String,
    pub converter_program: String,
    pub video_probe_program: String,
    pub recursive_default: bool,
    pub include_hidden_default: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_extension: "jpg".to_string(),
            live_photo_dir: DEFAULT_LIVE_PHOTO_DIR.to_string(),
            collision_marker: DEFAULT_COLLISION_MARKER.to_string(),
            converter_program: DEFAULT_CONVERTER_PROGRAM.to_string(),
            video_probe_program: DEFAULT_VIDEO_PROBE_PROGRAM.to_string(),
            recursive_default: false,
            include_hidden_default: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "livetidy", "livetidy")
        .context("could not determine the OS config directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    load_config_from(&paths.config_path)
}

/// Missing file means defaults; missing keys fall back to their defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!(
            "failed to create config directory: {}",
            paths.config_dir.display()
        )
    })?;
    let body = toml::to_string_pretty(config).context("failed to serialize config")?;
    fs::write(&paths.config_path, body).with_context(|| {
        format!(
            "failed to write config file: {}",
            paths.config_path.display()
        )
    })?;
    Ok(())
}
