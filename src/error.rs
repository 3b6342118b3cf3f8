//! Error types for sparsekit

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using sparsekit's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sparsekit operations
#[derive(Error, Debug)]
pub enum Error {
    /// A reader could not open or read its input file
    #[error("cannot read {}: {}", .path.display(), .source)]
    FileNotFound {
        /// Path the reader was given
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed text input
    #[error("{}:{}: {}", .path.display(), .line, .message)]
    Parse {
        /// Path of the offending file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Weighted read requested for an element type with no value storage
    #[error("weighted read requested but element type `{value_type}` carries no storage")]
    ConfigurationError {
        /// Name of the zero-sized element type
        value_type: &'static str,
    },

    /// Downcast requested against a non-matching stored identifier
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type the caller asked for
        expected: &'static str,
        /// The type actually stored
        found: &'static str,
    },

    /// No registered, guard-satisfying conversion for the requested triple
    #[error("no conversion registered from {from} to {to} under context [{context}]")]
    ConversionNotSupported {
        /// Source format identifier
        from: &'static str,
        /// Destination format identifier
        to: &'static str,
        /// Destination context name(s) that were tried
        context: String,
    },

    /// No (format, context) combination resolves for a preprocessing request
    #[error("no implementation reachable from format {format} under contexts [{contexts}]")]
    NoReorderImplementation {
        /// Format identifier of the input
        format: &'static str,
        /// Candidate context names, in priority order
        contexts: String,
    },
}
