//! Directory scan for gallery entries.
//!
//! Each immediate subdirectory of the root may contribute one entry: the first
//! file matching the image pattern, paired with the single file matching the
//! label pattern.

use std::path::{Path, PathBuf};

use crate::gallery::GalleryError;

/// File name pattern with at most one `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    prefix: String,
    suffix: Option<String>,
}

impl FilePattern {
    /// Parse a pattern such as `assembled_image*.png`.
    ///
    /// Without a `*`, the pattern matches the exact name only.
    pub fn new(pattern: &str) -> Self {
        match pattern.split_once('*') {
            Some((prefix, suffix)) => Self {
                prefix: prefix.to_string(),
                suffix: Some(suffix.to_string()),
            },
            None => Self {
                prefix: pattern.to_string(),
                suffix: None,
            },
        }
    }

    /// Check a file name against the pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.suffix {
            Some(suffix) => {
                name.len() >= self.prefix.len() + suffix.len()
                    && name.starts_with(&self.prefix)
                    && name.ends_with(suffix.as_str())
            }
            None => name == self.prefix,
        }
    }
}

/// An image and label file found in one subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedPair {
    pub image: PathBuf,
    pub labels: PathBuf,
}

/// Scan `root` and return one pair per qualifying subdirectory, in name order.
pub fn scan_root(
    root: &Path,
    image_pattern: &FilePattern,
    label_pattern: &FilePattern,
) -> Result<Vec<ScannedPair>, GalleryError> {
    let subdirs = read_sorted(root)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect::<Vec<_>>();

    let mut pairs = Vec::new();
    for dir in subdirs {
        let files = read_sorted(&dir)?
            .into_iter()
            .filter(|p| p.is_file())
            .collect::<Vec<_>>();

        let images: Vec<&PathBuf> = files
            .iter()
            .filter(|p| file_name(p).is_some_and(|n| image_pattern.matches(n)))
            .collect();
        let labels: Vec<&PathBuf> = files
            .iter()
            .filter(|p| file_name(p).is_some_and(|n| label_pattern.matches(n)))
            .collect();

        match (images.first(), labels.as_slice()) {
            (Some(image), [label]) => {
                log::debug!("Registered {:?} with labels {:?}", image, label);
                pairs.push(ScannedPair {
                    image: (*image).clone(),
                    labels: (*label).clone(),
                });
            }
            _ => {
                log::debug!(
                    "Skipping {:?}: {} image(s), {} label file(s)",
                    dir,
                    images.len(),
                    labels.len()
                );
            }
        }
    }

    Ok(pairs)
}

fn read_sorted(dir: &Path) -> Result<Vec<PathBuf>, GalleryError> {
    let entries = std::fs::read_dir(dir).map_err(|e| GalleryError::io(dir, e))?;
    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| GalleryError::io(dir, e))?;
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
