//! Inline image encoding for self-contained pages.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use image::codecs::jpeg::JpegEncoder;

use crate::constants::JPEG_QUALITY;
use crate::render::RenderError;

/// Open an image, flatten it to RGB and return it as a JPEG `data:` URI.
pub fn encode_data_uri(path: &Path) -> Result<String, RenderError> {
    let image_error = |source: image::ImageError| RenderError::Image {
        path: path.to_path_buf(),
        source,
    };

    let rgb = image::open(path).map_err(image_error)?.to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(image_error)?;

    log::trace!(
        "Encoded {:?} ({}x{}) as {} byte JPEG",
        path,
        rgb.width(),
        rgb.height(),
        jpeg.len()
    );

    Ok(format!(
        "data:image/jpeg;base64,{}",
        general_purpose::STANDARD.encode(&jpeg)
    ))
}
