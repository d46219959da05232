//! Error types for notebook conversion

use std::path::PathBuf;
use thiserror::Error;

/// Error type for notebook conversion operations
#[derive(Error, Debug)]
pub enum NotebookError {
    /// Source notebook could not be read
    #[error("Failed to read notebook file {}: {source}", path.display())]
    Read {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Structured notebook JSON is malformed or could not be serialized
    #[error("Failed to parse notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Converted notebook could not be written
    #[error("Failed to write notebook file {}: {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for notebook operations
pub type Result<T> = std::result::Result<T, NotebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path_and_cause() {
        let err = NotebookError::Read {
            path: PathBuf::from("missing.py"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing.py"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: NotebookError = json_err.into();
        assert!(err.to_string().starts_with("Failed to parse notebook JSON"));
    }
}
