//! Error types for revflow

use std::fmt;

/// Result type alias for revflow operations
pub type Result<T> = std::result::Result<T, RevflowError>;

/// Error types that can occur in revflow
#[derive(Debug)]
pub enum RevflowError {
    /// I/O error
    Io(std::io::Error),

    /// Body inconsistent with the fixed source wrap width
    MalformedBody {
        /// Absolute byte offset where the inconsistency was found
        offset: u64,
        /// Error message
        msg: String,
    },

    /// Structural problem found while scanning for records
    InvalidRecord {
        /// Absolute byte offset of the offending record
        offset: u64,
        /// Error message
        msg: String,
    },
}

impl fmt::Display for RevflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevflowError::Io(e) => write!(f, "I/O error: {}", e),
            RevflowError::MalformedBody { offset, msg } => {
                write!(f, "Malformed body at byte {}: {}", offset, msg)
            }
            RevflowError::InvalidRecord { offset, msg } => {
                write!(f, "Invalid record at byte {}: {}", offset, msg)
            }
        }
    }
}

impl std::error::Error for RevflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RevflowError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RevflowError {
    fn from(error: std::io::Error) -> Self {
        RevflowError::Io(error)
    }
}
