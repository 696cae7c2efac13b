use crate::metadata::VideoMetadataProvider;
use crate::tools::run_tool;
use anyhow::{bail, Result};
use std::path::Path;

pub const DEFAULT_VIDEO_PROBE_PROGRAM: &str = "mediainfo";

/// Asks MediaInfo for the container's encoded date.
#[derive(Debug, Clone)]
pub struct MediaInfoProbe {
    program: String,
}

impl Default for MediaInfoProbe {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_PROBE_PROGRAM)
    }
}

impl MediaInfoProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl VideoMetadataProvider for MediaInfoProbe {
    fn encoded_date(&self, path: &Path) -> Result<String> {
        let output = run_tool(
            &self.program,
            [
                std::ffi::OsStr::new("--Inform=General;%Encoded_Date%"),
                path.as_os_str(),
            ],
        )?;
        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if raw.is_empty() {
            bail!("no encoded date in {}", path.display());
        }
        Ok(raw)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn empty_output_is_an_error() {
        // `true` ignores its arguments and prints nothing.
        let err = MediaInfoProbe::new("true")
            .encoded_date(Path::new("/tmp/CLIP.MP4"))
            .expect_err("empty output should fail");
        assert!(err.to_string().contains("no encoded date"));
    }

    #[test]
    fn printed_value_is_trimmed() {
        // `echo` prints the requested arguments back, which is enough to see trimming.
        let raw = MediaInfoProbe::new("echo")
            .encoded_date(Path::new("CLIP.MP4"))
            .expect("echo should succeed");
        assert_eq!(raw, "--Inform=General;%Encoded_Date% CLIP.MP4");
    }
}
