//! bbox-gallery - bounding-box review server
//!
//! Serves a paginated gallery of images with their bounding boxes overlaid,
//! and writes the boxes a reviewer submits back to one CSV file per image.
//!
//! - [`gallery`]: the immutable image/box store built at startup
//! - [`render`]: template-driven, self-contained HTML pages
//! - [`export`]: normalization of submitted boxes and CSV output
//! - [`http`]: axum router, handlers and the optional basic auth gate

pub mod config;
pub mod constants;
pub mod export;
pub mod gallery;
pub mod http;
pub mod model;
pub mod render;

pub use config::{AppConfig, AuthConfig, ConfigError, LogLevel};
pub use http::{AppState, build_router};
