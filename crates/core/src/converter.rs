use crate::tools::run_tool;
use anyhow::Result;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONVERTER_PROGRAM: &str = "magick";

/// Re-encodes one image. Implementations must leave `source` untouched and
/// must not write anything at `destination` when they fail.
pub trait ImageConverter {
    fn convert(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// ImageMagick-style `<program> <source> <destination>`; the output
/// encoding follows the destination extension.
#[derive(Debug, Clone)]
pub struct MagickConverter {
    program: String,
}

impl Default for MagickConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER_PROGRAM)
    }
}

impl MagickConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ImageConverter for MagickConverter {
    fn convert(&self, source: &Path, destination: &Path) -> Result<()> {
        let result = run_tool(&self.program, [source.as_os_str(), destination.as_os_str()]);
        if result.is_err() && destination.exists() {
            // Partial output from a failed run.
            if let Err(err) = fs::remove_file(destination) {
                tracing::warn!("failed to remove partial {}: {err}", destination.display());
            }
        }
        result.map(|_| ())
    }
}
