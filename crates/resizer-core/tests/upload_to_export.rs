//! Integration test: drive a session from upload through edits to export
//! and back to empty, using only the public API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use resizer_core::{
    Dimensions, ExportConfig, ExportSizing, Filter, OutputFormat, ResizeUnit, ResizerError,
    Session, UploadOutcome,
};

/// Encode a `width` x `height` gradient as PNG bytes.
fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        let r = u8::try_from(x * 255 / width.max(1)).unwrap_or(u8::MAX);
        let g = u8::try_from(y * 255 / height.max(1)).unwrap_or(u8::MAX);
        image::Rgba([r, g, 128, 255])
    });
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )
    .unwrap();
    buf
}

#[test]
fn upload_edit_export_reset() {
    let mut session = Session::new();

    // Empty -> loaded.
    let outcome = session.load("gradient.png", gradient_png(300, 200));
    assert_eq!(outcome, UploadOutcome::Loaded(Dimensions::new(300, 200)));
    assert_eq!(session.resize_width(), 300);
    assert_eq!(session.resize_height(), 200);

    // Edited.
    session.set_width(150);
    assert_eq!(session.resize_height(), 100);
    session.set_quality(60);
    session.set_format(OutputFormat::Jpeg);
    session.set_filter(Filter::Sepia);

    // Exported: the default sizing is the fixed 500x500 surface.
    let exported = resizer_core::export(&session, &ExportConfig::default())
        .expect("export should succeed");
    assert_eq!(exported.file_name, "resized-image.jpeg");
    assert_eq!(exported.mime_type(), "image/jpeg");
    let decoded = image::load_from_memory(&exported.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (500, 500));

    // The same session honoring its own dimensions.
    let requested = resizer_core::export(
        &session,
        &ExportConfig {
            sizing: ExportSizing::Requested,
        },
    )
    .unwrap();
    let decoded = image::load_from_memory(&requested.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (150, 100));

    // Reset -> empty, and export becomes a no-op error.
    session.reset();
    assert!(!session.is_loaded());
    assert!(matches!(
        resizer_core::export(&session, &ExportConfig::default()),
        Err(ResizerError::NoImageLoaded),
    ));
}

#[test]
fn percentage_unit_with_requested_sizing() {
    let mut session = Session::new();
    let _ = session.load("gradient.png", gradient_png(80, 40));
    session.set_resize_unit(ResizeUnit::Percentage);
    session.toggle_aspect_ratio_lock();
    session.set_width(25);
    session.set_height(50);
    session.set_format(OutputFormat::Png);

    let exported = resizer_core::export(
        &session,
        &ExportConfig {
            sizing: ExportSizing::Requested,
        },
    )
    .unwrap();
    assert_eq!(exported.dimensions, Dimensions::new(20, 20));
}

#[test]
fn failed_upload_then_good_upload() {
    let mut session = Session::new();
    let outcome = session.load("broken.png", b"\x89PNG\r\n\x1a\nnot really".to_vec());
    assert!(matches!(outcome, UploadOutcome::Failed(_)));
    assert!(session.load_error().is_some());

    let outcome = session.load("ok.png", gradient_png(10, 20));
    assert_eq!(outcome, UploadOutcome::Loaded(Dimensions::new(10, 20)));
    assert!(session.load_error().is_none());
}
