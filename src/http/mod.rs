//! HTTP surface: the gallery page and the export endpoint.
//!
//! | Method | Path      | Handler                          |
//! |--------|-----------|----------------------------------|
//! | GET    | `/`       | [`handlers::gallery_handler`]    |
//! | POST   | `/export` | [`handlers::export_handler`]     |
//!
//! When credentials are configured, [`auth::basic_auth_middleware`] guards
//! both routes.

pub mod auth;
mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

use crate::export::AnnotationExporter;
use crate::gallery::GalleryStore;
use crate::render::PageRenderer;

pub use auth::{AuthOutcome, BasicAuth};
pub use error::ApiError;

/// Shared, read-only request context built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GalleryStore>,
    pub renderer: Arc<PageRenderer>,
    pub exporter: Arc<AnnotationExporter>,
    pub auth: Option<Arc<BasicAuth>>,
}

impl AppState {
    /// State without an auth gate.
    pub fn new(store: GalleryStore, renderer: PageRenderer, exporter: AnnotationExporter) -> Self {
        Self {
            store: Arc::new(store),
            renderer: Arc::new(renderer),
            exporter: Arc::new(exporter),
            auth: None,
        }
    }

    /// Require basic auth on every route.
    pub fn with_auth(mut self, auth: BasicAuth) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::gallery_handler))
        .route("/export", post(handlers::export_handler));

    let router = match &state.auth {
        Some(auth) => router.layer(from_fn_with_state(
            Arc::clone(auth),
            auth::basic_auth_middleware,
        )),
        None => router,
    };

    router.with_state(state)
}
