//! Error types for building the gallery.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while populating the gallery at startup.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// I/O error while reading a label file or scanning a directory
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// Path being read when the error occurred
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Label file is not valid JSON of the expected shape
    #[error("Invalid label file {path:?}: {source}")]
    LabelJson {
        /// Label file path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A label row has too few elements or a non-numeric value
    #[error("Invalid label row {row} in {path:?}: {message}")]
    InvalidLabelRow {
        /// Label file path
        path: PathBuf,
        /// Zero-based row number
        row: usize,
        /// Description of the problem
        message: String,
    },

    /// The gallery would have no entries
    #[error("Gallery is empty: add images or check the scan root")]
    Empty,

    /// Image and label lists differ in length
    #[error("Label lists must match images length ({labels} vs {images})")]
    LengthMismatch {
        /// Number of images
        images: usize,
        /// Number of label lists
        labels: usize,
    },
}

impl GalleryError {
    /// Wrap an I/O error with the path it relates to.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid label row error.
    pub fn invalid_row(path: impl Into<PathBuf>, row: usize, message: impl Into<String>) -> Self {
        Self::InvalidLabelRow {
            path: path.into(),
            row,
            message: message.into(),
        }
    }
}
