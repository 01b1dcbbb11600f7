//! Label file loading.
//!
//! A label file is a JSON array of numeric rows `[left, top, right, bottom, class]`.
//! Values are cast to integers and the trailing class id is replaced with its
//! category name.

use std::path::Path;

use serde_json::Value;

use crate::gallery::GalleryError;
use crate::model::{BoundingBox, ClassMap};

/// Minimum number of values in a label row.
const MIN_ROW_LEN: usize = 5;

/// Read and convert a label file.
pub fn load_labels(path: &Path, classes: &ClassMap) -> Result<Vec<BoundingBox>, GalleryError> {
    let bytes = std::fs::read(path).map_err(|e| GalleryError::io(path, e))?;
    let rows: Vec<Vec<Value>> =
        serde_json::from_slice(&bytes).map_err(|source| GalleryError::LabelJson {
            path: path.to_path_buf(),
            source,
        })?;

    let boxes = rows
        .iter()
        .enumerate()
        .map(|(row, values)| {
            parse_row(values, classes).map_err(|m| GalleryError::invalid_row(path, row, m))
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Loaded {} boxes from {:?}", boxes.len(), path);
    Ok(boxes)
}

fn parse_row(values: &[Value], classes: &ClassMap) -> Result<BoundingBox, String> {
    if values.len() < MIN_ROW_LEN {
        return Err(format!(
            "expected at least {} values, found {}",
            MIN_ROW_LEN,
            values.len()
        ));
    }

    let ints = values
        .iter()
        .map(as_int)
        .collect::<Result<Vec<_>, _>>()?;

    // The class is always the last value; any extras sit between it and the box.
    let class_id = ints[ints.len() - 1];
    Ok(BoundingBox::new(
        ints[0],
        ints[1],
        ints[2],
        ints[3],
        classes.label(class_id),
    ))
}

/// Truncating integer cast, accepting integral and floating JSON numbers.
fn as_int(value: &Value) -> Result<i64, String> {
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(format!("value {} is not an integer", value)),
    }
}
