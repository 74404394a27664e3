//! Encoding rendered pixels into the selected output format.
//!
//! - JPEG honors [`Quality`]; JPEG has no alpha channel, so pixels are
//!   composited over black first (what a canvas JPEG export produces).
//! - WebP is lossy at [`Quality`] and keeps alpha.
//! - PNG is lossless; quality is ignored.

use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

use crate::types::{OutputFormat, Quality, ResizerError};

/// Encode `image` as `format`.
///
/// # Errors
///
/// Returns [`ResizerError::Encode`] if the encoder rejects the image
/// (e.g., dimensions beyond the format's limits).
pub fn encode(
    image: &RgbaImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, ResizerError> {
    let (width, height) = image.dimensions();
    let mut buf = Vec::new();

    let written = match format {
        OutputFormat::Jpeg => {
            let flattened = flatten_over_black(image);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.get())
                .write_image(flattened.as_raw(), width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut buf).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::WebP => return encode_webp(image, quality),
    };

    written.map_err(|e| ResizerError::Encode {
        format,
        reason: e.to_string(),
    })?;

    Ok(buf)
}

/// Lossy WebP via libwebp, quality mapped 1:1 onto its 0-100 scale.
fn encode_webp(image: &RgbaImage, quality: Quality) -> Result<Vec<u8>, ResizerError> {
    let (width, height) = image.dimensions();
    let encoded = webp::Encoder::from_rgba(image.as_raw(), width, height)
        .encode_simple(false, f32::from(quality.get()))
        .map_err(|e| ResizerError::Encode {
            format: OutputFormat::WebP,
            reason: format!("{e:?}"),
        })?;
    Ok(encoded.to_vec())
}

/// Drop the alpha channel by compositing each pixel over opaque black.
fn flatten_over_black(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        image::Rgb([premultiply(r, a), premultiply(g, a), premultiply(b, a)])
    })
}

/// `channel * alpha / 255`, rounded.
fn premultiply(channel: u8, alpha: u8) -> u8 {
    let scaled = (u16::from(channel) * u16::from(alpha) + 127) / 255;
    u8::try_from(scaled).unwrap_or(u8::MAX)
}
