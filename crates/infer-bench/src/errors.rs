use std::fmt;
use std::io;
use thiserror::Error;

/// Errors raised while turning raw measurements into benchmark metrics
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot aggregate a run with no measurements")]
    EmptyRun,

    #[error("Cannot compare a session with no runs")]
    EmptySession,

    #[error("No run found for venue: {0}")]
    MissingVenue(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigError(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type for benchmark metric operations
pub type BenchResult<T> = Result<T, BenchError>;

impl BenchError {
    pub fn invalid_input<M: fmt::Display>(message: M) -> Self {
        BenchError::InvalidInput(message.to_string())
    }

    pub fn missing_venue(venue: &str) -> Self {
        BenchError::MissingVenue(venue.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BenchError::invalid_input("label 7 out of range").to_string(),
            "Invalid input: label 7 out of range"
        );
        assert_eq!(
            BenchError::missing_venue("Server").to_string(),
            "No run found for venue: Server"
        );
        assert_eq!(
            BenchError::EmptyRun.to_string(),
            "Cannot aggregate a run with no measurements"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err: BenchError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, BenchError::JsonParseError(_)));
    }

    #[test]
    fn test_io_error_converts() {
        let err: BenchError = io::Error::new(io::ErrorKind::NotFound, "runs.json").into();
        assert!(matches!(err, BenchError::IoError(_)));
        assert_eq!(err.to_string(), "I/O error: runs.json");
    }
}
