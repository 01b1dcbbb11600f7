//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::export::ExportError;
use crate::render::RenderError;

/// Failure of a request handler.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client sent something unusable
    #[error("{0}")]
    BadRequest(String),

    /// Page could not be rendered
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Export failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Blocking task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// Status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Export(ExportError::MalformedBox { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Render(_) | ApiError::Export(_) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("Rejected request: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
