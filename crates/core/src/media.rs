use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Stills the converter is asked to re-encode.
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &["png", "heic"];
/// Stills that receive a date prefix, in addition to the run's target extension.
pub const STILL_EXTENSIONS: &[&str] = &["heic", "png", "jpg", "jpeg"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov"];
/// Motion half of a live photo.
pub const LIVE_PHOTO_COMPANION_EXTENSION: &str = "mov";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    Still,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Descend one level into subdirectories.
    pub recursive: bool,
    pub include_hidden: bool,
}

/// Lists regular files under `root` accepted by `accept`, sorted by path.
///
/// The listing is a snapshot: callers mutate the directory only after it returns.
pub fn scan_files<F>(root: &Path, options: ScanOptions, accept: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut out = Vec::new();

    if options.recursive {
        for entry in WalkDir::new(root).max_depth(2).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("failed to walk directory: {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if is_hidden(path) && !options.include_hidden {
                continue;
            }
            if accept(path) {
                out.push(path.to_path_buf());
            }
        }
    } else {
        for entry in fs::read_dir(root)
            .with_context(|| format!("failed to read directory: {}", root.display()))?
        {
            let entry =
                entry.with_context(|| format!("failed to read entry in: {}", root.display()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if is_hidden(&path) && !options.include_hidden {
                continue;
            }
            if accept(&path) {
                out.push(path);
            }
        }
    }

    out.sort();
    Ok(out)
}

/// Stills and videos eligible for a date prefix. Stills are always taken from
/// `root` itself; videos follow `options.recursive`.
pub fn scan_renamable(
    root: &Path,
    target_extension: &str,
    options: ScanOptions,
) -> Result<Vec<MediaFile>> {
    let flat = ScanOptions {
        recursive: false,
        ..options
    };
    let mut files: Vec<MediaFile> = scan_files(root, flat, |path| {
        is_still(path) || has_extension(path, &[target_extension])
    })?
    .into_iter()
    .map(|path| MediaFile {
        path,
        kind: MediaKind::Still,
    })
    .collect();

    let videos = scan_files(root, options, is_video)?;
    files.extend(videos.into_iter().map(|path| MediaFile {
        path,
        kind: MediaKind::Video,
    }));
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

pub fn is_convertible(path: &Path) -> bool {
    has_extension(path, CONVERTIBLE_EXTENSIONS)
}

pub fn is_still(path: &Path) -> bool {
    has_extension(path, STILL_EXTENSIONS)
}

pub fn is_video(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
