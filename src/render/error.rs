//! Error types for page rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a template or rendering a page.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Template file does not exist
    #[error("Template file not found: {path:?}")]
    TemplateNotFound {
        /// Expected template location
        path: PathBuf,
    },

    /// I/O error while reading the template
    #[error("IO error reading template {path:?}: {source}")]
    Io {
        /// Template path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed placeholder syntax
    #[error("Template syntax error at byte {offset}: {message}")]
    Syntax {
        /// Byte offset into the template source
        offset: usize,
        /// Description of the problem
        message: String,
    },

    /// Placeholder name with no value
    #[error("Unknown template placeholder '{name}'")]
    UnknownPlaceholder {
        /// The unrecognized name
        name: String,
    },

    /// Image could not be decoded or re-encoded
    #[error("Image error for {path:?}: {source}")]
    Image {
        /// Image path
        path: PathBuf,
        /// Underlying codec error
        #[source]
        source: image::ImageError,
    },

    /// Box list could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    /// Create a syntax error at the given offset.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}
