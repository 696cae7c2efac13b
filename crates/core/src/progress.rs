use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    LivePhotos,
    Rename,
    Convert,
    DeleteOriginals,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::LivePhotos => "live-photos",
            Phase::Rename => "rename",
            Phase::Convert => "convert",
            Phase::DeleteOriginals => "delete-originals",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventOutcome {
    Moved { to: PathBuf },
    Renamed { to: PathBuf },
    SkippedNoDate,
    SkippedAlreadyPrefixed,
    Converted { to: PathBuf },
    Deleted,
    Failed { reason: String },
}

/// One processed file. `index` is 1-based within its phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub index: usize,
    pub total: usize,
    pub path: PathBuf,
    pub outcome: EventOutcome,
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}/{} {}",
            self.phase,
            self.index,
            self.total,
            self.path.display()
        )?;
        match &self.outcome {
            EventOutcome::Moved { to } => write!(f, " -> moved to {}", to.display()),
            EventOutcome::Renamed { to } => write!(f, " -> renamed to {}", to.display()),
            EventOutcome::SkippedNoDate => write!(f, " -> skipped (no date taken)"),
            EventOutcome::SkippedAlreadyPrefixed => write!(f, " -> skipped (already prefixed)"),
            EventOutcome::Converted { to } => write!(f, " -> converted to {}", to.display()),
            EventOutcome::Deleted => write!(f, " -> deleted"),
            EventOutcome::Failed { reason } => write!(f, " -> FAILED: {reason}"),
        }
    }
}

/// Receives ordered per-file progress lines.
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent);

    /// Phase-level notes, such as "no live photos found".
    fn note(&mut self, _phase: Phase, _message: &str) {}
}

/// Forwards progress into `tracing`: failures at WARN, everything else at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&mut self, event: ProgressEvent) {
        match event.outcome {
            EventOutcome::Failed { .. } => tracing::warn!("{event}"),
            _ => tracing::info!("{event}"),
        }
    }

    fn note(&mut self, phase: Phase, message: &str) {
        tracing::info!("[{phase}] {message}");
    }
}

impl ProgressSink for Vec<ProgressEvent> {
    fn report(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}
