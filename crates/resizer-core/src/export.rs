//! The export routine: rasterize, filter, encode.
//!
//! By default the output surface is a fixed 500x500 regardless of the
//! session's target width and height, and the image is stretched to fill
//! it. [`ExportSizing::Requested`] is the opt-in fix that honors the
//! target dimensions (and the resize unit).

use image::RgbaImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::encode;
use crate::filter::apply_filter;
use crate::session::{MAX_DIMENSION, Session};
use crate::types::{Dimensions, Filter, OutputFormat, ResizeUnit, ResizerError};

/// Output size used by [`ExportSizing::Fixed`].
pub const FIXED_EXPORT_SIZE: Dimensions = Dimensions::new(500, 500);

/// Base name of every exported file (`resized-image.<ext>`).
pub const EXPORT_BASENAME: &str = "resized-image";

/// How the export routine picks its output surface size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportSizing {
    /// Always [`FIXED_EXPORT_SIZE`]; target width, height, and unit are
    /// not consulted.
    #[default]
    Fixed,
    /// The session's target width and height, in its resize unit.
    Requested,
}

/// Export options that are not part of the session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output surface sizing.
    pub sizing: ExportSizing,
}

/// An encoded image ready to be downloaded or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Suggested file name, `resized-image.<ext>`.
    pub file_name: String,
    /// Encoding used.
    pub format: OutputFormat,
    /// Pixel size of the encoded image.
    pub dimensions: Dimensions,
}

impl ExportedImage {
    /// MIME type for the download Blob.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// File name for an export in `format`.
#[must_use]
pub fn file_name(format: OutputFormat) -> String {
    format!("{EXPORT_BASENAME}.{}", format.extension())
}

/// Size of the output surface for the current session.
///
/// # Errors
///
/// Returns [`ResizerError::NoImageLoaded`] if nothing is loaded.
pub fn target_dimensions(
    session: &Session,
    config: &ExportConfig,
) -> Result<Dimensions, ResizerError> {
    let original = session.original().ok_or(ResizerError::NoImageLoaded)?;
    match config.sizing {
        ExportSizing::Fixed => Ok(FIXED_EXPORT_SIZE),
        ExportSizing::Requested => Ok(match session.resize_unit() {
            ResizeUnit::Pixels => Dimensions::new(
                session.resize_width().clamp(1, MAX_DIMENSION),
                session.resize_height().clamp(1, MAX_DIMENSION),
            ),
            ResizeUnit::Percentage => Dimensions::new(
                percent_of(original.width, session.resize_width()),
                percent_of(original.height, session.resize_height()),
            ),
        }),
    }
}

/// Run the export routine against the session's loaded image.
///
/// # Errors
///
/// Returns [`ResizerError::NoImageLoaded`] if nothing is loaded, or
/// [`ResizerError::Encode`] if encoding fails.
pub fn export(session: &Session, config: &ExportConfig) -> Result<ExportedImage, ResizerError> {
    let preview = session.preview().ok_or(ResizerError::NoImageLoaded)?;
    let target = target_dimensions(session, config)?;
    let format = session.format();
    let started = Instant::now();

    let rendered = render(preview.pixels(), target, session.filter());
    let bytes = encode::encode(&rendered, format, session.quality())?;

    tracing::debug!(
        width = target.width,
        height = target.height,
        %format,
        quality = session.quality().get(),
        filter = %session.filter(),
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "exported image"
    );

    Ok(ExportedImage {
        bytes,
        file_name: file_name(format),
        format,
        dimensions: target,
    })
}

/// Stretch `source` onto a `target`-sized surface and apply `filter`.
///
/// The aspect ratio is not preserved, matching a canvas `drawImage` into
/// the full surface.
#[must_use]
pub fn render(source: &RgbaImage, target: Dimensions, filter: Filter) -> RgbaImage {
    let mut surface = if source.dimensions() == (target.width, target.height) {
        source.clone()
    } else {
        imageops::resize(source, target.width, target.height, FilterType::Triangle)
    };
    apply_filter(&mut surface, filter);
    surface
}

/// `round(original * percent / 100)`, at least 1 and at most
/// [`MAX_DIMENSION`].
fn percent_of(original: u32, percent: u32) -> u32 {
    let scaled = (u64::from(original) * u64::from(percent) * 2 + 100) / 200;
    u32::try_from(scaled)
        .unwrap_or(MAX_DIMENSION)
        .clamp(1, MAX_DIMENSION)
}
