use crate::collision::CollisionResolver;
use crate::converter::ImageConverter;
use crate::error::PipelineError;
use crate::media::{has_extension, is_convertible, scan_files, ScanOptions};
use crate::progress::{EventOutcome, Phase, ProgressEvent, ProgressSink};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Converted,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub original: PathBuf,
    pub destination: PathBuf,
    pub outcome: ConversionOutcome,
}

impl ConversionResult {
    pub fn succeeded(&self) -> bool {
        self.outcome == ConversionOutcome::Converted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConversionReport {
    pub results: Vec<ConversionResult>,
}

impl ConversionReport {
    pub fn converted(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.converted()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedOriginal {
    pub path: PathBuf,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeleteReport {
    pub entries: Vec<DeletedOriginal>,
    /// Set when the confirmation prompt was declined.
    pub declined: bool,
}

impl DeleteReport {
    pub fn deleted(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_none()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.deleted()
    }
}

/// Converts every png/heic directly inside `dir` to `target_extension`.
///
/// Originals are never modified. A converter failure marks that file as
/// failed and the batch continues. An empty candidate set is
/// [`PipelineError::NothingToConvert`].
pub fn convert_all(
    dir: &Path,
    target_extension: &str,
    options: ScanOptions,
    converter: &dyn ImageConverter,
    resolver: &mut CollisionResolver,
    sink: &mut dyn ProgressSink,
) -> Result<ConversionReport> {
    let flat = ScanOptions {
        recursive: false,
        ..options
    };
    // A file already in the target encoding needs no conversion.
    let candidates = scan_files(dir, flat, |path| {
        is_convertible(path) && !has_extension(path, &[target_extension])
    })?;
    if candidates.is_empty() {
        return Err(PipelineError::NothingToConvert {
            dir: dir.to_path_buf(),
        }
        .into());
    }

    let total = candidates.len();
    let mut report = ConversionReport {
        results: Vec::with_capacity(total),
    };

    for (i, original) in candidates.into_iter().enumerate() {
        let destination = resolver.resolve(&original.with_extension(target_extension));
        let outcome = match converter.convert(&original, &destination) {
            Ok(()) => ConversionOutcome::Converted,
            Err(err) => ConversionOutcome::Failed {
                reason: format!("{err:#}"),
            },
        };

        sink.report(ProgressEvent {
            phase: Phase::Convert,
            index: i + 1,
            total,
            path: original.clone(),
            outcome: match &outcome {
                ConversionOutcome::Converted => EventOutcome::Converted {
                    to: destination.clone(),
                },
                ConversionOutcome::Failed { reason } => EventOutcome::Failed {
                    reason: reason.clone(),
                },
            },
        });

        report.results.push(ConversionResult {
            original,
            destination,
            outcome,
        });
    }

    Ok(report)
}

/// Removes the originals of successful conversions. Failed conversions keep
/// their originals. Irreversible.
pub fn delete_converted_originals(
    conversions: &ConversionReport,
    sink: &mut dyn ProgressSink,
) -> DeleteReport {
    let doomed: Vec<&ConversionResult> = conversions
        .results
        .iter()
        .filter(|r| r.succeeded() && r.destination.exists())
        .collect();
    let total = doomed.len();
    let mut report = DeleteReport::default();

    for (i, result) in doomed.into_iter().enumerate() {
        let error = fs::remove_file(&result.original)
            .err()
            .map(|err| format!("failed to delete {}: {err}", result.original.display()));

        sink.report(ProgressEvent {
            phase: Phase::DeleteOriginals,
            index: i + 1,
            total,
            path: result.original.clone(),
            outcome: match &error {
                None => EventOutcome::Deleted,
                Some(reason) => EventOutcome::Failed {
                    reason: reason.clone(),
                },
            },
        });

        report.entries.push(DeletedOriginal {
            path: result.original.clone(),
            error,
        });
    }

    report
}
