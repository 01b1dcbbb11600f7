//! Data models shared by the gallery, renderer and exporter.

mod bbox;
mod category;

pub use bbox::BoundingBox;
pub use category::{Category, ClassMap, UNKNOWN_LABEL, default_categories};
