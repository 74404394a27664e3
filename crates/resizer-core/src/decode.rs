//! Image decoding.
//!
//! Accepts raw uploaded bytes (PNG, JPEG, BMP, WebP, GIF) and produces
//! the RGBA pixels that back the preview and every later export.
//! Decoding happens once per upload; exports reuse the decoded pixels.

use image::RgbaImage;

use crate::types::{Dimensions, ResizerError};

/// A successfully decoded upload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: RgbaImage,
    source_format: Option<image::ImageFormat>,
}

impl DecodedImage {
    /// Wrap already-decoded pixels, e.g. from a test fixture.
    #[must_use]
    pub const fn from_pixels(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            source_format: None,
        }
    }

    /// The decoded RGBA pixels.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Intrinsic pixel dimensions of the source image.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    /// MIME type of the uploaded file, when the container was recognized.
    ///
    /// Used to label the preview Blob so the browser renders the
    /// original bytes directly.
    #[must_use]
    pub fn source_mime_type(&self) -> Option<&'static str> {
        self.source_format.map(|f| f.to_mime_type())
    }
}

/// Sniff the MIME type of raw image bytes from their magic number.
///
/// Cheap enough to call before decoding, e.g. to label a preview Blob.
#[must_use]
pub fn guess_mime_type(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// Decode raw image bytes into RGBA pixels.
///
/// # Errors
///
/// Returns [`ResizerError::EmptyInput`] if `bytes` is empty.
/// Returns [`ResizerError::Decode`] if the format is unrecognized or the
/// data is corrupt.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ResizerError> {
    if bytes.is_empty() {
        return Err(ResizerError::EmptyInput);
    }

    let source_format = image::guess_format(bytes).ok();
    let decoded = image::load_from_memory(bytes)?;
    let pixels = decoded.to_rgba8();

    tracing::debug!(
        width = pixels.width(),
        height = pixels.height(),
        format = ?source_format,
        "decoded upload"
    );

    Ok(DecodedImage {
        pixels,
        source_format,
    })
}
