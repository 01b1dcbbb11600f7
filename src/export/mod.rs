//! Annotation export to per-image CSV files.
//!
//! Every export rewrites `annotations_img{idx}.csv` from scratch: header plus
//! one row per submitted box, in submission order. Boxes exported earlier for
//! the same index and missing from the new submission are gone afterwards;
//! the page always submits its full box list.
//!
//! There is no locking. Two concurrent exports for one index race and the
//! last writer wins; distinct indices never share a file.

mod csv;
mod error;
mod record;
mod timestamp;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::constants::CSV_HEADERS;
use crate::gallery::GalleryStore;

pub use csv::{escape_field, write_row};
pub use error::ExportError;
pub use record::{AnnotationRecord, MIN_BOX_FIELDS, cell_text, normalize_box};
pub use timestamp::{format_iso, iso_or_now, parse_epoch_millis};

/// Body of an export request.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    /// Gallery index the boxes belong to (not wrapped)
    pub image_idx: i64,
    /// Submitted boxes, each a 5, 6 or 7 field array
    #[serde(default)]
    pub boxes: Vec<Vec<Value>>,
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// File that was written
    pub path: PathBuf,
    /// Number of data rows (excluding the header)
    pub rows: usize,
}

/// Writes submitted boxes under a fixed directory.
#[derive(Debug, Clone)]
pub struct AnnotationExporter {
    dir: PathBuf,
}

impl AnnotationExporter {
    /// Create an exporter writing into `dir` (created on first export).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// CSV file for an image index.
    pub fn file_path(&self, image_idx: i64) -> PathBuf {
        self.dir.join(format!("annotations_img{}.csv", image_idx))
    }

    /// Export a request using the current time for missing timestamps.
    pub fn export(
        &self,
        store: &GalleryStore,
        request: &ExportRequest,
    ) -> Result<ExportSummary, ExportError> {
        self.export_at(store, request, Utc::now())
    }

    /// Export a request with an explicit "now".
    ///
    /// All boxes are normalized before the file is touched, so a malformed box
    /// leaves any previous export intact.
    pub fn export_at(
        &self,
        store: &GalleryStore,
        request: &ExportRequest,
        now: DateTime<Utc>,
    ) -> Result<ExportSummary, ExportError> {
        let image_path = match store.path_of(request.image_idx) {
            Some(path) => path.to_string_lossy().into_owned(),
            None => {
                log::warn!(
                    "Image index {} out of range (0..{}), recording index instead of path",
                    request.image_idx,
                    store.len()
                );
                request.image_idx.to_string()
            }
        };

        let records = request
            .boxes
            .iter()
            .enumerate()
            .map(|(i, fields)| normalize_box(i, fields, &image_path, now))
            .collect::<Result<Vec<_>, _>>()?;

        let path = self.file_path(request.image_idx);
        self.write_records(&path, &records)?;

        log::info!(
            "Exported {} boxes for image {} to {:?}",
            records.len(),
            request.image_idx,
            path
        );
        Ok(ExportSummary {
            path,
            rows: records.len(),
        })
    }

    fn write_records(&self, path: &Path, records: &[AnnotationRecord]) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let file = File::create(path).map_err(io_error(path))?;
        let mut writer = BufWriter::new(file);
        write_row(&mut writer, &CSV_HEADERS).map_err(io_error(path))?;
        for record in records {
            write_row(&mut writer, &record.cells()).map_err(io_error(path))?;
        }
        writer.flush().map_err(io_error(path))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError {
    let path = path.to_path_buf();
    move |source| ExportError::Io { path, source }
}
