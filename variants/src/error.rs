//! Error types for the variant pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline errors
///
/// Per-target compiler failures are not errors; they are reported through
/// [`crate::invoker::BuildOutcome`] and never abort the run.
#[derive(Error, Debug)]
pub enum Error {
    /// The template exists but could not be read as UTF-8 text
    #[error("failed to read template {path}: {source}")]
    ReadTemplate {
        /// Template path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A generated variant source could not be written
    #[error("failed to write {path}: {source}")]
    WriteArtifact {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The manifest could not be read, parsed or validated
    #[error("invalid manifest {path}: {message}")]
    Manifest {
        /// Manifest path
        path: PathBuf,
        /// Error description
        message: String,
    },

    /// An architecture descriptor failed validation
    #[error("invalid target '{name}': {reason}")]
    InvalidTarget {
        /// Target name as configured
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A path pattern cannot distinguish targets
    #[error("path pattern '{pattern}' must contain the {{target}} placeholder")]
    InvalidLayout {
        /// Offending pattern
        pattern: String,
    },
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
