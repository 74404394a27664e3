//! File download via Blob URLs.
//!
//! Dioxus has no built-in file download API.  This module triggers
//! downloads by creating a `Blob`, generating an object URL, and
//! programmatically clicking a temporary `<a>` element.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use resizer_core::ExportedImage;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

use crate::raster;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

impl From<raster::RasterError> for DownloadError {
    fn from(err: raster::RasterError) -> Self {
        Self::JsError(err.to_string())
    }
}

/// Download an exported image under its suggested file name.
///
/// # Errors
///
/// See [`trigger_download`].
pub fn download_export(exported: &ExportedImage) -> Result<(), DownloadError> {
    trigger_download(&exported.bytes, &exported.file_name, exported.mime_type())
}

/// Trigger a file download in the browser.
///
/// Creates a `Blob` from `data`, generates an object URL, and
/// programmatically clicks a temporary `<a download="filename">` element.
/// The object URL is revoked after the click.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails
/// (e.g., `Blob` creation, `URL.createObjectURL`, element creation).
pub fn trigger_download(
    data: &[u8],
    filename: &str,
    mime_type: &str,
) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let url = raster::bytes_to_blob_url(data, mime_type)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;

    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download has started; cleanup failures are not reported.
    let _ = body.remove_child(&anchor);
    raster::revoke_blob_url(&url);

    tracing::info!(filename, bytes = data.len(), "download triggered");
    Ok(())
}
