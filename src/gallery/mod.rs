//! Gallery store: the ordered image list and its parallel box lists.
//!
//! The store is populated once at startup from a [`GallerySource`] and never
//! mutated afterwards. Any integer index resolves to an entry by wrapping
//! modulo the entry count, which is how next/previous navigation loops.
//!
//! ```rust,ignore
//! use bbox_gallery::gallery::{GallerySource, GalleryStore};
//! use bbox_gallery::model::ClassMap;
//!
//! let store = GalleryStore::from_source(&source, &ClassMap::default())?;
//! let (prev, next) = store.neighbors(idx);
//! ```

mod error;
mod labels;
mod scan;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_IMAGE_PATTERN, DEFAULT_LABEL_PATTERN};
use crate::model::{BoundingBox, ClassMap};

pub use error::GalleryError;
pub use labels::load_labels;
pub use scan::{FilePattern, ScannedPair, scan_root};

/// Where gallery entries come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GallerySource {
    /// Explicit image paths with one label file per image, in the same order.
    Static {
        images: Vec<PathBuf>,
        labels: Vec<PathBuf>,
    },
    /// One entry per qualifying subdirectory of `root`.
    Scan {
        root: PathBuf,
        #[serde(default = "default_image_pattern")]
        image_pattern: String,
        #[serde(default = "default_label_pattern")]
        label_pattern: String,
    },
}

fn default_image_pattern() -> String {
    DEFAULT_IMAGE_PATTERN.to_string()
}

fn default_label_pattern() -> String {
    DEFAULT_LABEL_PATTERN.to_string()
}

impl GallerySource {
    /// Scan source with the default file patterns.
    pub fn scan(root: impl Into<PathBuf>) -> Self {
        Self::Scan {
            root: root.into(),
            image_pattern: default_image_pattern(),
            label_pattern: default_label_pattern(),
        }
    }
}

/// One image with its bounding boxes.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    /// Image location on disk
    pub image: PathBuf,
    /// Boxes loaded from the image's label file
    pub boxes: Vec<BoundingBox>,
}

/// Immutable, index-addressed gallery.
#[derive(Debug, Clone)]
pub struct GalleryStore {
    entries: Vec<GalleryEntry>,
}

impl GalleryStore {
    /// Pair images with box lists, enforcing the startup invariants.
    pub fn new(images: Vec<PathBuf>, boxes: Vec<Vec<BoundingBox>>) -> Result<Self, GalleryError> {
        if images.is_empty() {
            return Err(GalleryError::Empty);
        }
        if images.len() != boxes.len() {
            return Err(GalleryError::LengthMismatch {
                images: images.len(),
                labels: boxes.len(),
            });
        }

        let entries = images
            .into_iter()
            .zip(boxes)
            .map(|(image, boxes)| GalleryEntry { image, boxes })
            .collect();
        Ok(Self { entries })
    }

    /// Populate the store from a configured source.
    pub fn from_source(source: &GallerySource, classes: &ClassMap) -> Result<Self, GalleryError> {
        let (images, label_files) = match source {
            GallerySource::Static { images, labels } => (images.clone(), labels.clone()),
            GallerySource::Scan {
                root,
                image_pattern,
                label_pattern,
            } => {
                let pairs = scan_root(
                    root,
                    &FilePattern::new(image_pattern),
                    &FilePattern::new(label_pattern),
                )?;
                log::info!("Scanned {:?}: {} entries", root, pairs.len());
                pairs.into_iter().map(|p| (p.image, p.labels)).unzip()
            }
        };

        if images.is_empty() {
            return Err(GalleryError::Empty);
        }

        let boxes = label_files
            .iter()
            .map(|path| load_labels(path, classes))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(images, boxes)
    }

    /// Number of entries (always at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed store.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wrap any index into `0..len`.
    pub fn resolve(&self, idx: i64) -> usize {
        let len = self.entries.len() as i64;
        idx.rem_euclid(len) as usize
    }

    /// Entry at the wrapped index.
    pub fn get(&self, idx: i64) -> &GalleryEntry {
        &self.entries[self.resolve(idx)]
    }

    /// `(prev, next)` indices around the wrapped index.
    pub fn neighbors(&self, idx: i64) -> (usize, usize) {
        let idx = self.resolve(idx) as i64;
        (self.resolve(idx - 1), self.resolve(idx + 1))
    }

    /// Image path for an in-range index, without wrapping.
    pub fn path_of(&self, idx: i64) -> Option<&Path> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.entries.get(i))
            .map(|e| e.image.as_path())
    }

    /// All entries in order.
    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }
}
