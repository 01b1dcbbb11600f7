//! Error types for annotation export.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while exporting submitted boxes.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A submitted box has fewer fields than the minimal layout
    #[error("Box {index} has {len} fields, expected at least 5")]
    MalformedBox {
        /// Position of the box in the submission
        index: usize,
        /// Number of fields it had
        len: usize,
    },

    /// I/O error while writing the CSV file
    #[error("IO error writing {path:?}: {source}")]
    Io {
        /// File or directory being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
