//! Route handlers.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use serde::Deserialize;

use crate::export::ExportRequest;
use crate::http::{ApiError, AppState};

/// Query string of the gallery page.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// Requested index, wrapped into range; defaults to 0
    pub idx: Option<i64>,
}

/// `GET /?idx=<int>`
pub async fn gallery_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, ApiError> {
    let idx = query.idx.unwrap_or(0);
    let html =
        tokio::task::spawn_blocking(move || state.renderer.render(&state.store, idx)).await??;
    Ok(Html(html))
}

/// `POST /export`
pub async fn export_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: ExportRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid export body: {}", e)))?;

    tokio::task::spawn_blocking(move || state.exporter.export(&state.store, &request)).await??;
    Ok((StatusCode::OK, "OK"))
}
