//! Normalization of submitted boxes into CSV records.
//!
//! Clients send boxes in one of three layouts, told apart by length only:
//!
//! - 7 fields: `[x1, y1, x2, y2, class, timestamp, _]`
//! - 6 fields: `[x1, y1, x2, y2, class, timestamp]`
//! - otherwise: `[x1, y1, x2, y2, class, ..]` stamped with the current time
//!
//! Geometry is not validated.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::export::ExportError;
use crate::export::timestamp::{format_iso, iso_or_now};

/// Minimum number of fields in a submitted box.
pub const MIN_BOX_FIELDS: usize = 5;

/// One persisted CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub timestamp: String,
    pub image_path: String,
    pub left: String,
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub class: String,
}

impl AnnotationRecord {
    /// Cells in header order.
    pub fn cells(&self) -> [&str; 7] {
        [
            self.timestamp.as_str(),
            self.image_path.as_str(),
            self.left.as_str(),
            self.top.as_str(),
            self.right.as_str(),
            self.bottom.as_str(),
            self.class.as_str(),
        ]
    }
}

/// Text of a JSON value as written to CSV: strings raw, everything else as JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalize the box at `index` of a submission.
pub fn normalize_box(
    index: usize,
    fields: &[Value],
    image_path: &str,
    now: DateTime<Utc>,
) -> Result<AnnotationRecord, ExportError> {
    if fields.len() < MIN_BOX_FIELDS {
        return Err(ExportError::MalformedBox {
            index,
            len: fields.len(),
        });
    }

    let timestamp = match fields.len() {
        6 | 7 => iso_or_now(&fields[5], now),
        _ => format_iso(now),
    };

    Ok(AnnotationRecord {
        timestamp,
        image_path: image_path.to_string(),
        left: cell_text(&fields[0]),
        top: cell_text(&fields[1]),
        right: cell_text(&fields[2]),
        bottom: cell_text(&fields[3]),
        class: cell_text(&fields[4]),
    })
}
