use crate::collision::CollisionResolver;
use crate::media::{has_extension, is_still, scan_files, ScanOptions, LIVE_PHOTO_COMPANION_EXTENSION};
use crate::progress::{EventOutcome, Phase, ProgressEvent, ProgressSink};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LIVE_PHOTO_DIR: &str = "Live Photos";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivePhotoMove {
    pub still: PathBuf,
    pub video: PathBuf,
    pub destination: PathBuf,
    pub error: Option<String>,
}

impl LivePhotoMove {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LivePhotoReport {
    pub moves: Vec<LivePhotoMove>,
}

impl LivePhotoReport {
    pub fn moved(&self) -> usize {
        self.moves.iter().filter(|m| m.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.moves.len() - self.moved()
    }
}

/// Finds the motion clip next to each still (same stem, `.mov`) and moves it
/// into `dest_dir`. Stills are not touched. `dest_dir` is only created when
/// at least one clip is found.
pub fn organize(
    source_dir: &Path,
    dest_dir: &Path,
    options: ScanOptions,
    resolver: &mut CollisionResolver,
    sink: &mut dyn ProgressSink,
) -> Result<LivePhotoReport> {
    let flat = ScanOptions {
        recursive: false,
        ..options
    };
    let stills = scan_files(source_dir, flat, is_still)?;
    let mut companions = index_companions(source_dir, flat)?;

    let mut pairs = Vec::<(PathBuf, PathBuf)>::new();
    for still in stills {
        if let Some(video) = take_companion(&mut companions, &still) {
            pairs.push((still, video));
        }
    }

    if pairs.is_empty() {
        sink.note(Phase::LivePhotos, "no live photo clips found");
        return Ok(LivePhotoReport::default());
    }

    fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create folder: {}", dest_dir.display()))?;

    let total = pairs.len();
    let mut report = LivePhotoReport::default();
    for (i, (still, video)) in pairs.into_iter().enumerate() {
        let file_name = video
            .file_name()
            .map(|v| v.to_os_string())
            .unwrap_or_default();
        let destination = resolver.resolve(&dest_dir.join(file_name));

        let error = fs::rename(&video, &destination)
            .with_context(|| {
                format!(
                    "failed to move {} -> {}",
                    video.display(),
                    destination.display()
                )
            })
            .err()
            .map(|err| format!("{err:#}"));

        let outcome = match &error {
            None => EventOutcome::Moved {
                to: destination.clone(),
            },
            Some(reason) => EventOutcome::Failed {
                reason: reason.clone(),
            },
        };
        sink.report(ProgressEvent {
            phase: Phase::LivePhotos,
            index: i + 1,
            total,
            path: video.clone(),
            outcome,
        });

        report.moves.push(LivePhotoMove {
            still,
            video,
            destination,
            error,
        });
    }

    Ok(report)
}

fn index_companions(
    source_dir: &Path,
    options: ScanOptions,
) -> Result<HashMap<String, Vec<PathBuf>>> {
    let mut by_stem = HashMap::<String, Vec<PathBuf>>::new();
    for path in scan_files(source_dir, options, |p| {
        has_extension(p, &[LIVE_PHOTO_COMPANION_EXTENSION])
    })? {
        let Some(stem) = path.file_stem() else {
            continue;
        };
        by_stem
            .entry(stem.to_string_lossy().to_lowercase())
            .or_default()
            .push(path);
    }
    Ok(by_stem)
}

/// Prefers a clip whose stem matches exactly, then any case variant.
/// A clip is handed out at most once.
fn take_companion(
    companions: &mut HashMap<String, Vec<PathBuf>>,
    still: &Path,
) -> Option<PathBuf> {
    let stem = still.file_stem()?.to_string_lossy().to_string();
    let candidates = companions.get_mut(&stem.to_lowercase())?;
    if candidates.is_empty() {
        return None;
    }

    let exact = candidates.iter().position(|candidate| {
        candidate
            .file_stem()
            .map(|s| s.to_string_lossy() == stem)
            .unwrap_or(false)
    });
    Some(candidates.remove(exact.unwrap_or(0)))
}
