//! Global constants for the gallery service

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:8001";

/// Default page template, relative to the working directory
pub const DEFAULT_TEMPLATE: &str = "templates/app.html";

/// Default directory for exported CSV files
pub const DEFAULT_ANNOTATIONS_DIR: &str = "annotations";

/// Default file name pattern for gallery images in scan mode
pub const DEFAULT_IMAGE_PATTERN: &str = "assembled_image*.png";

/// Default file name pattern for label files in scan mode
pub const DEFAULT_LABEL_PATTERN: &str = "bboxes_labels*.json";

/// JPEG quality used for embedded page images
pub const JPEG_QUALITY: u8 = 85;

/// Header row of every exported CSV file
pub const CSV_HEADERS: [&str; 7] = [
    "timestamp",
    "image_path",
    "left",
    "top",
    "right",
    "bottom",
    "class",
];

/// Default realm sent in the basic auth challenge
pub const DEFAULT_AUTH_REALM: &str = "bbox-gallery";
