use livetidy_core::PipelineError;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    DirectoryNotFound = 3,
    NothingToConvert = 4,
    VideoMetadata = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::DirectoryNotFound { .. }) => ExitCode::DirectoryNotFound,
            Some(PipelineError::NothingToConvert { .. }) => ExitCode::NothingToConvert,
            Some(PipelineError::VideoMetadata { .. }) => ExitCode::VideoMetadata,
            Some(PipelineError::InvalidConfig(_)) => ExitCode::InvalidArguments,
            None => ExitCode::GeneralError,
        }
    }
}
