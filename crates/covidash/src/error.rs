//! Application-wide error types using thiserror.

use covidash_common::DashError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A pipeline stage failed.
    #[error("{} failed: {0}", .0.stage())]
    Stage(#[from] DashError),

    /// The logging subscriber could not be installed.
    #[error("logging failed: {0}")]
    Logging(String),

    /// The async runtime could not be started.
    #[error("runtime failed: {0}")]
    Runtime(#[source] std::io::Error),
}

impl AppError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Stage(e) => e.exit_code(),
            Self::Logging(_) | Self::Runtime(_) => 1,
        }
    }
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_message_and_exit_code() {
        let err = AppError::from(DashError::retrieval("http://127.0.0.1:9/", "connection refused"));
        assert!(err.to_string().starts_with("retrieval failed: "));
        assert_eq!(err.exit_code(), 2);

        let err = AppError::from(DashError::schema("deaths", "raw"));
        assert!(err.to_string().starts_with("schema failed: "));
        assert_eq!(err.exit_code(), 4);

        assert_eq!(AppError::Logging("bad".to_string()).exit_code(), 1);
    }
}
