use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Failure to read a single property off an annotation.
///
/// These are never fatal for a scan: the scanner logs them and falls back to
/// the inferred schema for the affected field or class.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnotationError {
    #[error("@{annotation}.{property}: expected {expected} value, found {found}")]
    WrongKind {
        annotation: String,
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("@{annotation}.{property}: `{value}` is not a valid {expected}")]
    InvalidValue {
        annotation: String,
        property: String,
        value: String,
        expected: &'static str,
    },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}
