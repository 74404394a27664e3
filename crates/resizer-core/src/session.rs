//! The in-memory session state and its update handlers.
//!
//! [`Session`] is the single state store for one page view. Every UI
//! event maps onto one `&mut self` method; nothing here touches the
//! browser, so the same transitions drive the web app, the CLI, and the
//! tests.
//!
//! # Uploads and staleness
//!
//! Decoding is asynchronous in the browser. [`Session::begin_upload`]
//! bumps a generation counter and hands back an [`UploadTicket`];
//! [`Session::complete_upload`] only applies a decode result whose ticket
//! still matches. A slow decode of an earlier file therefore can never
//! overwrite a newer upload, and a reset invalidates everything in
//! flight.

use std::rc::Rc;

use crate::decode::{self, DecodedImage};
use crate::types::{Dimensions, Filter, OutputFormat, Quality, ResizeUnit, ResizerError};

/// Largest width or height accepted by the dimension handlers.
pub const MAX_DIMENSION: u32 = 16_384;

/// The uploaded file as picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// File name as reported by the picker.
    pub name: String,
    /// Raw file bytes.
    pub bytes: Rc<[u8]>,
}

/// Proof that an upload was started, keyed to its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
}

impl UploadTicket {
    /// Generation this upload belongs to.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// What [`Session::complete_upload`] did with a decode result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The image is loaded; dimensions were seeded from it.
    Loaded(Dimensions),
    /// Decoding failed; the message is now the session's load error.
    Failed(String),
    /// A newer upload or a reset happened first; the result was dropped.
    Stale,
}

/// Session state for one page view.
///
/// Defaults: no image, 0x0 target, quality 80, JPEG, aspect lock on,
/// pixel units, no filter, light mode.
#[derive(Debug, Clone)]
pub struct Session {
    source: Option<SourceImage>,
    preview: Option<Rc<DecodedImage>>,
    original: Option<Dimensions>,
    resize_width: u32,
    resize_height: u32,
    quality: Quality,
    format: OutputFormat,
    aspect_ratio_locked: bool,
    resize_unit: ResizeUnit,
    filter: Filter,
    dark_mode: bool,
    generation: u64,
    load_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            preview: None,
            original: None,
            resize_width: 0,
            resize_height: 0,
            quality: Quality::DEFAULT,
            format: OutputFormat::default(),
            aspect_ratio_locked: true,
            resize_unit: ResizeUnit::default(),
            filter: Filter::default(),
            dark_mode: false,
            generation: 0,
            load_error: None,
        }
    }

    // --- Uploads ---

    /// Record a newly picked file and start a new upload generation.
    ///
    /// Clears the previous preview, original dimensions, target size, and
    /// load error. Option settings (quality, format, filter, unit, lock)
    /// carry over.
    pub fn begin_upload(
        &mut self,
        name: impl Into<String>,
        bytes: impl Into<Rc<[u8]>>,
    ) -> UploadTicket {
        self.generation += 1;
        self.source = Some(SourceImage {
            name: name.into(),
            bytes: bytes.into(),
        });
        self.preview = None;
        self.original = None;
        self.resize_width = 0;
        self.resize_height = 0;
        self.load_error = None;
        UploadTicket {
            generation: self.generation,
        }
    }

    /// Apply the decode result for `ticket`.
    ///
    /// Stale tickets are ignored. On success the target width and height
    /// are seeded from the image's intrinsic size.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<DecodedImage, ResizerError>,
    ) -> UploadOutcome {
        if ticket.generation != self.generation || self.source.is_none() {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale decode result"
            );
            return UploadOutcome::Stale;
        }

        match result {
            Ok(decoded) => {
                let dims = decoded.dimensions();
                self.original = Some(dims);
                (self.resize_width, self.resize_height) = match self.resize_unit {
                    ResizeUnit::Pixels => (dims.width, dims.height),
                    ResizeUnit::Percentage => (100, 100),
                };
                self.preview = Some(Rc::new(decoded));
                self.load_error = None;
                UploadOutcome::Loaded(dims)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "upload failed to decode");
                self.preview = None;
                self.original = None;
                self.load_error = Some(message.clone());
                UploadOutcome::Failed(message)
            }
        }
    }

    /// Begin an upload and decode it synchronously.
    pub fn load(
        &mut self,
        name: impl Into<String>,
        bytes: impl Into<Rc<[u8]>>,
    ) -> UploadOutcome {
        let ticket = self.begin_upload(name, bytes);
        let result = self
            .source
            .as_ref()
            .map_or(Err(ResizerError::EmptyInput), |s| {
                decode::decode_image(&s.bytes)
            });
        self.complete_upload(ticket, result)
    }

    // --- Dimension handlers ---

    /// Set the target width, clamped to `[1, MAX_DIMENSION]`.
    ///
    /// With the aspect lock on and an image loaded, the height follows:
    /// `round(original_height * width / original_width)` in pixels, or
    /// the same percentage in percent.
    pub fn set_width(&mut self, width: i64) {
        self.resize_width = clamp_dimension(width);
        if let (true, Some(orig)) = (self.aspect_ratio_locked, self.original) {
            self.resize_height = match self.resize_unit {
                ResizeUnit::Pixels => scale(self.resize_width, orig.height, orig.width),
                ResizeUnit::Percentage => self.resize_width,
            };
        }
    }

    /// Set the target height, clamped to `[1, MAX_DIMENSION]`.
    ///
    /// With the aspect lock on and an image loaded, the width follows:
    /// `round(original_width * height / original_height)` in pixels, or
    /// the same percentage in percent.
    pub fn set_height(&mut self, height: i64) {
        self.resize_height = clamp_dimension(height);
        if let (true, Some(orig)) = (self.aspect_ratio_locked, self.original) {
            self.resize_width = match self.resize_unit {
                ResizeUnit::Pixels => scale(self.resize_height, orig.width, orig.height),
                ResizeUnit::Percentage => self.resize_height,
            };
        }
    }

    // --- Option handlers ---

    /// Set the encoding quality, clamped to 1-100.
    pub fn set_quality(&mut self, quality: i64) {
        self.quality = Quality::new(quality);
    }

    /// Select the output format.
    pub const fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Select the filter.
    pub const fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Select the resize unit.
    ///
    /// With an image loaded, the stored width and height are converted so
    /// they describe the same size in the new unit.
    pub fn set_resize_unit(&mut self, unit: ResizeUnit) {
        if unit == self.resize_unit {
            return;
        }
        if let Some(orig) = self.original {
            (self.resize_width, self.resize_height) = match unit {
                ResizeUnit::Percentage => (
                    scale(self.resize_width, 100, orig.width),
                    scale(self.resize_height, 100, orig.height),
                ),
                ResizeUnit::Pixels => (
                    scale(orig.width, self.resize_width, 100),
                    scale(orig.height, self.resize_height, 100),
                ),
            };
        }
        self.resize_unit = unit;
    }

    /// Flip the aspect-ratio lock. Dimensions are not recomputed.
    pub const fn toggle_aspect_ratio_lock(&mut self) {
        self.aspect_ratio_locked = !self.aspect_ratio_locked;
    }

    /// Flip dark mode.
    pub const fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Restore every field to its default in one step.
    ///
    /// The generation keeps counting up so in-flight decodes go stale.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::new()
        };
    }

    // --- Accessors ---

    /// The uploaded file, if any.
    #[must_use]
    pub const fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The decoded preview, once loading finished.
    #[must_use]
    pub const fn preview(&self) -> Option<&Rc<DecodedImage>> {
        self.preview.as_ref()
    }

    /// Intrinsic size of the loaded image.
    #[must_use]
    pub const fn original(&self) -> Option<Dimensions> {
        self.original
    }

    /// Target width (0 until an image loads).
    #[must_use]
    pub const fn resize_width(&self) -> u32 {
        self.resize_width
    }

    /// Target height (0 until an image loads).
    #[must_use]
    pub const fn resize_height(&self) -> u32 {
        self.resize_height
    }

    /// Encoding quality.
    #[must_use]
    pub const fn quality(&self) -> Quality {
        self.quality
    }

    /// Output format.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether width and height are coupled.
    #[must_use]
    pub const fn aspect_ratio_locked(&self) -> bool {
        self.aspect_ratio_locked
    }

    /// Unit of the width/height inputs.
    #[must_use]
    pub const fn resize_unit(&self) -> ResizeUnit {
        self.resize_unit
    }

    /// Selected filter.
    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    /// Presentation-only dark mode flag.
    #[must_use]
    pub const fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Current upload generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// User-visible message from the last failed decode.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// `true` once a preview is available.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.preview.is_some()
    }

    /// `true` between `begin_upload` and its completion.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.source.is_some() && self.preview.is_none() && self.load_error.is_none()
    }
}

/// Parse the text of a width/height input.
///
/// Returns `None` for empty or non-numeric text so the caller can leave
/// the field unchanged. Fractions are rounded; range clamping is left to
/// the setters.
#[must_use]
pub fn parse_dimension(text: &str) -> Option<i64> {
    let value = text.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    Some(rounded)
}

fn clamp_dimension(value: i64) -> u32 {
    let clamped = value.clamp(1, i64::from(MAX_DIMENSION));
    u32::try_from(clamped).unwrap_or(MAX_DIMENSION)
}

/// `round(value * numerator / denominator)` with halves rounded up,
/// clamped like any user-entered dimension.
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return clamp_dimension(i64::from(value));
    }
    let product = 2 * u64::from(value) * u64::from(numerator);
    let rounded = (product + u64::from(denominator)) / (2 * u64::from(denominator));
    clamp_dimension(i64::try_from(rounded).unwrap_or(i64::MAX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decoded(width: u32, height: u32) -> DecodedImage {
        DecodedImage::from_pixels(image::RgbaImage::new(width, height))
    }

    /// A session with a `width` x `height` image already loaded.
    fn loaded(width: u32, height: u32) -> Session {
        let mut session = Session::new();
        let ticket = session.begin_upload("photo.png", vec![1u8, 2, 3]);
        let outcome = session.complete_upload(ticket, Ok(decoded(width, height)));
        assert_eq!(outcome, UploadOutcome::Loaded(Dimensions::new(width, height)));
        session
    }

    // --- Defaults ---

    #[test]
    fn new_session_has_documented_defaults() {
        let s = Session::new();
        assert!(s.source().is_none());
        assert!(s.preview().is_none());
        assert!(s.original().is_none());
        assert_eq!(s.resize_width(), 0);
        assert_eq!(s.resize_height(), 0);
        assert_eq!(s.quality().get(), 80);
        assert_eq!(s.format(), OutputFormat::Jpeg);
        assert!(s.aspect_ratio_locked());
        assert_eq!(s.resize_unit(), ResizeUnit::Pixels);
        assert_eq!(s.filter(), Filter::None);
        assert!(!s.dark_mode());
        assert!(s.load_error().is_none());
        assert!(!s.is_loading());
    }

    #[test]
    fn default_matches_new() {
        let s = Session::default();
        assert!(s.aspect_ratio_locked());
        assert_eq!(s.quality().get(), 80);
    }

    // --- Upload ---

    #[test]
    fn upload_seeds_dimensions_from_image() {
        let s = loaded(640, 480);
        assert_eq!(s.resize_width(), 640);
        assert_eq!(s.resize_height(), 480);
        assert_eq!(s.original(), Some(Dimensions::new(640, 480)));
        assert!(s.is_loaded());
        assert!(!s.is_loading());
    }

    #[test]
    fn begin_upload_marks_loading() {
        let mut s = Session::new();
        let ticket = s.begin_upload("a.png", vec![0u8]);
        assert!(s.is_loading());
        assert_eq!(ticket.generation(), s.generation());
        assert_eq!(s.source().map(|src| src.name.as_str()), Some("a.png"));
    }

    #[test]
    fn stale_decode_does_not_clobber_newer_upload() {
        let mut s = Session::new();
        let first = s.begin_upload("slow.png", vec![0u8]);
        let second = s.begin_upload("fast.png", vec![1u8]);

        assert_eq!(
            s.complete_upload(second, Ok(decoded(100, 50))),
            UploadOutcome::Loaded(Dimensions::new(100, 50)),
        );
        assert_eq!(s.complete_upload(first, Ok(decoded(9, 9))), UploadOutcome::Stale);

        assert_eq!(s.original(), Some(Dimensions::new(100, 50)));
        assert_eq!(s.source().map(|src| src.name.as_str()), Some("fast.png"));
    }

    #[test]
    fn decode_after_reset_is_stale() {
        let mut s = Session::new();
        let ticket = s.begin_upload("a.png", vec![0u8]);
        s.reset();
        assert_eq!(s.complete_upload(ticket, Ok(decoded(4, 4))), UploadOutcome::Stale);
        assert!(s.preview().is_none());
        assert_eq!(s.resize_width(), 0);
    }

    #[test]
    fn decode_failure_sets_visible_error() {
        let mut s = Session::new();
        let outcome = s.load("notes.txt", b"definitely not an image".to_vec());
        assert!(matches!(outcome, UploadOutcome::Failed(_)));
        assert!(s.preview().is_none());
        assert!(s.original().is_none());
        assert!(s.load_error().unwrap().starts_with("failed to decode image"));
        assert!(!s.is_loading());
    }

    #[test]
    fn empty_upload_fails() {
        let mut s = Session::new();
        let outcome = s.load("empty.png", Vec::new());
        assert_eq!(outcome, UploadOutcome::Failed("input image data is empty".into()));
    }

    #[test]
    fn new_upload_clears_previous_error_and_keeps_options() {
        let mut s = Session::new();
        s.set_format(OutputFormat::Png);
        s.set_quality(33);
        let _ = s.load("bad.bin", vec![0u8, 1]);
        assert!(s.load_error().is_some());

        let ticket = s.begin_upload("good.png", vec![9u8]);
        assert!(s.load_error().is_none());
        let _ = s.complete_upload(ticket, Ok(decoded(10, 10)));
        assert_eq!(s.format(), OutputFormat::Png);
        assert_eq!(s.quality().get(), 33);
    }

    // --- Dimension handlers ---

    #[test]
    fn locked_width_change_recomputes_height() {
        let mut s = loaded(1920, 1080);
        s.set_width(1280);
        assert_eq!(s.resize_width(), 1280);
        assert_eq!(s.resize_height(), 720);
    }

    #[test]
    fn locked_height_change_recomputes_width() {
        let mut s = loaded(1920, 1080);
        s.set_height(540);
        assert_eq!(s.resize_height(), 540);
        assert_eq!(s.resize_width(), 960);
    }

    #[test]
    fn locked_recompute_rounds_half_up() {
        let mut s = loaded(1920, 1080);
        // 1080 * 1000 / 1920 = 562.5
        s.set_width(1000);
        assert_eq!(s.resize_height(), 563);

        let mut s = loaded(3, 2);
        // 3 * 1 / 2 = 1.5
        s.set_height(1);
        assert_eq!(s.resize_width(), 2);
    }

    #[test]
    fn unlocked_change_leaves_other_dimension() {
        let mut s = loaded(800, 600);
        s.toggle_aspect_ratio_lock();
        s.set_width(100);
        assert_eq!(s.resize_width(), 100);
        assert_eq!(s.resize_height(), 600);
        s.set_height(42);
        assert_eq!(s.resize_width(), 100);
        assert_eq!(s.resize_height(), 42);
    }

    #[test]
    fn dimensions_clamp_to_at_least_one() {
        let mut s = loaded(800, 600);
        s.toggle_aspect_ratio_lock();
        s.set_width(0);
        assert_eq!(s.resize_width(), 1);
        s.set_height(-25);
        assert_eq!(s.resize_height(), 1);
    }

    #[test]
    fn dimensions_clamp_to_max() {
        let mut s = loaded(10, 10);
        s.set_width(1_000_000);
        assert_eq!(s.resize_width(), MAX_DIMENSION);
        assert_eq!(s.resize_height(), MAX_DIMENSION);
    }

    #[test]
    fn locked_recompute_never_reaches_zero() {
        let mut s = loaded(1000, 1);
        s.set_width(10);
        // 1 * 10 / 1000 = 0.01
        assert_eq!(s.resize_height(), 1);
    }

    #[test]
    fn lock_without_image_only_sets_one_dimension() {
        let mut s = Session::new();
        s.set_width(300);
        assert_eq!(s.resize_width(), 300);
        assert_eq!(s.resize_height(), 0);
    }

    #[test]
    fn toggling_lock_does_not_recompute() {
        let mut s = loaded(400, 200);
        s.toggle_aspect_ratio_lock();
        s.set_width(100);
        s.toggle_aspect_ratio_lock();
        assert!(s.aspect_ratio_locked());
        assert_eq!(s.resize_width(), 100);
        assert_eq!(s.resize_height(), 200);
    }

    #[test]
    fn parse_dimension_accepts_numbers_and_rejects_text() {
        assert_eq!(parse_dimension("640"), Some(640));
        assert_eq!(parse_dimension(" 12.6 "), Some(13));
        assert_eq!(parse_dimension("-3"), Some(-3));
        assert_eq!(parse_dimension(""), None);
        assert_eq!(parse_dimension("abc"), None);
        assert_eq!(parse_dimension("inf"), None);
        assert_eq!(parse_dimension("NaN"), None);
    }

    // --- Options ---

    #[test]
    fn quality_setter_clamps() {
        let mut s = Session::new();
        s.set_quality(0);
        assert_eq!(s.quality().get(), 1);
        s.set_quality(150);
        assert_eq!(s.quality().get(), 100);
        s.set_quality(64);
        assert_eq!(s.quality().get(), 64);
    }

    #[test]
    fn option_setters_apply() {
        let mut s = Session::new();
        s.set_format(OutputFormat::WebP);
        s.set_filter(Filter::Sepia);
        s.set_resize_unit(ResizeUnit::Percentage);
        s.toggle_dark_mode();
        assert_eq!(s.format(), OutputFormat::WebP);
        assert_eq!(s.filter(), Filter::Sepia);
        assert_eq!(s.resize_unit(), ResizeUnit::Percentage);
        assert!(s.dark_mode());
    }

    // --- Resize unit ---

    #[test]
    fn switching_to_percentage_converts_dimensions() {
        let mut s = loaded(640, 480);
        s.set_resize_unit(ResizeUnit::Percentage);
        assert_eq!((s.resize_width(), s.resize_height()), (100, 100));

        s.set_resize_unit(ResizeUnit::Pixels);
        assert_eq!((s.resize_width(), s.resize_height()), (640, 480));
    }

    #[test]
    fn switching_unit_keeps_edited_size() {
        let mut s = loaded(200, 100);
        s.set_width(50);
        s.set_resize_unit(ResizeUnit::Percentage);
        assert_eq!((s.resize_width(), s.resize_height()), (25, 25));
    }

    #[test]
    fn locked_percentage_copies_to_other_axis() {
        let mut s = loaded(200, 100);
        s.set_resize_unit(ResizeUnit::Percentage);
        s.set_width(50);
        assert_eq!(s.resize_height(), 50);
        s.set_height(30);
        assert_eq!(s.resize_width(), 30);
    }

    #[test]
    fn upload_in_percentage_seeds_full_size() {
        let mut s = Session::new();
        s.set_resize_unit(ResizeUnit::Percentage);
        let ticket = s.begin_upload("photo.png", vec![1u8]);
        let _ = s.complete_upload(ticket, Ok(decoded(640, 480)));
        assert_eq!((s.resize_width(), s.resize_height()), (100, 100));
    }

    // --- Reset ---

    #[test]
    fn reset_restores_every_default() {
        let mut s = loaded(320, 200);
        s.set_width(160);
        s.set_quality(5);
        s.set_format(OutputFormat::Png);
        s.set_filter(Filter::Grayscale);
        s.set_resize_unit(ResizeUnit::Percentage);
        s.toggle_aspect_ratio_lock();
        s.toggle_dark_mode();
        let before = s.generation();

        s.reset();

        assert!(s.source().is_none());
        assert!(s.preview().is_none());
        assert!(s.original().is_none());
        assert_eq!(s.resize_width(), 0);
        assert_eq!(s.resize_height(), 0);
        assert_eq!(s.quality(), Quality::DEFAULT);
        assert_eq!(s.format(), OutputFormat::Jpeg);
        assert!(s.aspect_ratio_locked());
        assert_eq!(s.resize_unit(), ResizeUnit::Pixels);
        assert_eq!(s.filter(), Filter::None);
        assert!(!s.dark_mode());
        assert!(s.load_error().is_none());
        assert!(s.generation() > before);
    }

    #[test]
    fn reset_clears_load_error() {
        let mut s = Session::new();
        let _ = s.load("x", vec![1u8]);
        assert!(s.load_error().is_some());
        s.reset();
        assert!(s.load_error().is_none());
    }
}
