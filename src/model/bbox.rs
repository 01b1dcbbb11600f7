//! Bounding box as stored in label files and rendered into pages.

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Axis-aligned box in image pixels with a resolved class label.
///
/// Serializes as `[left, top, right, bottom, "label"]`, the layout the page
/// script reads back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub label: String,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(left: i64, top: i64, right: i64, bottom: i64, label: impl Into<String>) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            label: label.into(),
        }
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(5))?;
        seq.serialize_element(&self.left)?;
        seq.serialize_element(&self.top)?;
        seq.serialize_element(&self.right)?;
        seq.serialize_element(&self.bottom)?;
        seq.serialize_element(&self.label)?;
        seq.end()
    }
}
