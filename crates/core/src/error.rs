use std::path::PathBuf;
use thiserror::Error;

/// Conditions that halt a run. Per-file problems are reported as outcomes instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("directory does not exist: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("nothing to convert: no png/heic files in {}", dir.display())]
    NothingToConvert { dir: PathBuf },

    #[error("could not read video metadata for {}: {reason}", path.display())]
    VideoMetadata { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::PipelineError;
    use std::path::PathBuf;

    #[test]
    fn video_metadata_message_names_file_and_reason() {
        let err = PipelineError::VideoMetadata {
            path: PathBuf::from("/tmp/CLIP.MP4"),
            reason: "unexpected format".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("CLIP.MP4"));
        assert!(message.contains("unexpected format"));
    }

    #[test]
    fn fatal_errors_survive_anyhow_downcast() {
        let err = anyhow::Error::new(PipelineError::NothingToConvert {
            dir: PathBuf::from("/tmp/photos"),
        })
        .context("conversion phase");
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::NothingToConvert { .. })
        ));
    }
}
