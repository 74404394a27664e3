//! Shared types for the resizer session and export routine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// pixel data without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create a new pair of dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px x {}px", self.width, self.height)
    }
}

/// Encoding quality on a 1-100 scale.
///
/// Always within [`Quality::MIN`]..=[`Quality::MAX`]; every constructor
/// clamps. Only lossy formats consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest accepted quality.
    pub const MIN: u8 = 1;
    /// Highest accepted quality.
    pub const MAX: u8 = 100;
    /// Quality used for a fresh session.
    pub const DEFAULT: Self = Self(80);

    /// Create a quality value, clamping into `[MIN, MAX]`.
    #[must_use]
    pub fn new(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = clamped as u8;
        Self(value)
    }

    /// The raw 1-100 value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<Quality> for u8 {
    fn from(value: Quality) -> Self {
        value.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output encoding selected for the exported file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG; honors [`Quality`].
    #[default]
    Jpeg,
    /// Lossless PNG.
    Png,
    /// Lossy WebP; honors [`Quality`].
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    /// All formats, in the order the UI lists them.
    pub const ALL: [Self; 3] = [Self::Jpeg, Self::Png, Self::WebP];

    /// File extension used for the download name (`resized-image.<ext>`).
    ///
    /// Also the value used by the format `<select>`.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// MIME type of the encoded output.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WebP",
        }
    }

    /// Whether the encoder ignores [`Quality`] for this format.
    #[must_use]
    pub const fn is_lossless(self) -> bool {
        matches!(self, Self::Png)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputFormat {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            "png" | "image/png" => Ok(Self::Png),
            "webp" | "image/webp" => Ok(Self::WebP),
            _ => Err(ParseOptionError::new("format", s)),
        }
    }
}

/// Visual filter baked into the exported image.
///
/// Each variant corresponds to a CSS filter function at full strength,
/// so the preview can use the browser's CSS filter while the export
/// applies the equivalent color matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// No filter.
    #[default]
    None,
    /// `grayscale(100%)`.
    Grayscale,
    /// `sepia(100%)`.
    Sepia,
}

impl Filter {
    /// All filters, in the order the UI lists them.
    pub const ALL: [Self; 3] = [Self::None, Self::Grayscale, Self::Sepia];

    /// CSS `filter` property value for the preview.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale(100%)",
            Self::Sepia => "sepia(100%)",
        }
    }

    /// Short identifier used by the `<select>` and the CLI.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Grayscale => "Grayscale",
            Self::Sepia => "Sepia",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Filter {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "grayscale" | "greyscale" | "grayscale(100%)" => Ok(Self::Grayscale),
            "sepia" | "sepia(100%)" => Ok(Self::Sepia),
            _ => Err(ParseOptionError::new("filter", s)),
        }
    }
}

/// Unit the width/height inputs are expressed in.
///
/// Under the default fixed export sizing this is display-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeUnit {
    /// Absolute pixels.
    #[default]
    Pixels,
    /// Percent of the original dimension.
    Percentage,
}

impl ResizeUnit {
    /// All units, in the order the UI lists them.
    pub const ALL: [Self; 2] = [Self::Pixels, Self::Percentage];

    /// Short identifier used by the `<select>` and the CLI.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pixels => "pixels",
            Self::Percentage => "percentage",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pixels => "Pixels",
            Self::Percentage => "Percentage",
        }
    }
}

impl fmt::Display for ResizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResizeUnit {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pixels" | "pixel" | "px" => Ok(Self::Pixels),
            "percentage" | "percent" | "%" => Ok(Self::Percentage),
            _ => Err(ParseOptionError::new("resize unit", s)),
        }
    }
}

/// A select/CLI value did not name a known option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl ParseOptionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Errors surfaced by decoding and exporting.
///
/// Every variant renders as a message suitable for showing to the user.
#[derive(Debug, thiserror::Error)]
pub enum ResizerError {
    /// The uploaded data was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The uploaded data is not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Encoding to the target format failed.
    #[error("failed to encode {format} image: {reason}")]
    Encode {
        /// Format that was being produced.
        format: OutputFormat,
        /// Encoder failure message.
        reason: String,
    },

    /// Export was requested before any image finished loading.
    #[error("no image loaded")]
    NoImageLoaded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_into_range() {
        assert_eq!(Quality::new(0).get(), 1);
        assert_eq!(Quality::new(-40).get(), 1);
        assert_eq!(Quality::new(101).get(), 100);
        assert_eq!(Quality::new(i64::MAX).get(), 100);
        assert_eq!(Quality::new(55).get(), 55);
    }

    #[test]
    fn quality_default_is_80() {
        assert_eq!(Quality::default().get(), 80);
    }

    #[test]
    fn quality_deserialize_clamps() {
        let q: Quality = serde_json::from_str("0").unwrap_or_default();
        assert_eq!(q.get(), 1);
        let q: Quality = serde_json::from_str("250").unwrap_or_default();
        assert_eq!(q.get(), 100);
    }

    #[test]
    fn format_extensions_and_mime() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpeg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::WebP.extension(), "webp");
        for format in OutputFormat::ALL {
            assert_eq!(
                format.mime_type(),
                format!("image/{}", format.extension()),
            );
        }
    }

    #[test]
    fn format_parses_select_values_and_aliases() {
        assert_eq!("jpeg".parse(), Ok(OutputFormat::Jpeg));
        assert_eq!("JPG".parse(), Ok(OutputFormat::Jpeg));
        assert_eq!(" png ".parse(), Ok(OutputFormat::Png));
        assert_eq!("webp".parse(), Ok(OutputFormat::WebP));
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn format_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OutputFormat::WebP).ok().as_deref(),
            Some("\"webp\""),
        );
        assert_eq!(
            serde_json::to_string(&OutputFormat::Jpeg).ok().as_deref(),
            Some("\"jpeg\""),
        );
    }

    #[test]
    fn only_png_is_lossless() {
        assert!(!OutputFormat::Jpeg.is_lossless());
        assert!(OutputFormat::Png.is_lossless());
        assert!(!OutputFormat::WebP.is_lossless());
    }

    #[test]
    fn filter_parses_css_and_short_forms() {
        assert_eq!("none".parse(), Ok(Filter::None));
        assert_eq!("grayscale(100%)".parse(), Ok(Filter::Grayscale));
        assert_eq!("grayscale".parse(), Ok(Filter::Grayscale));
        assert_eq!("sepia(100%)".parse(), Ok(Filter::Sepia));
        assert!("blur(2px)".parse::<Filter>().is_err());
    }

    #[test]
    fn filter_css_round_trips_through_parse() {
        for filter in Filter::ALL {
            assert_eq!(filter.css().parse(), Ok(filter));
            assert_eq!(filter.key().parse(), Ok(filter));
        }
    }

    #[test]
    fn resize_unit_parses() {
        assert_eq!("pixels".parse(), Ok(ResizeUnit::Pixels));
        assert_eq!("px".parse(), Ok(ResizeUnit::Pixels));
        assert_eq!("%".parse(), Ok(ResizeUnit::Percentage));
        assert!("inches".parse::<ResizeUnit>().is_err());
    }

    #[test]
    fn parse_error_names_the_option() {
        let err = "tiff".parse::<OutputFormat>().err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("unknown format: \"tiff\""));
    }

    #[test]
    fn dimensions_display() {
        assert_eq!(Dimensions::new(640, 480).to_string(), "640px x 480px");
    }

    #[test]
    fn encode_error_message_names_format() {
        let err = ResizerError::Encode {
            format: OutputFormat::WebP,
            reason: "unsupported".into(),
        };
        assert_eq!(err.to_string(), "failed to encode WebP image: unsupported");
    }
}
