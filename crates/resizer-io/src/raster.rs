//! Blob URL creation for encoded image bytes.
//!
//! The preview `<img>` and the download anchor both point at object
//! URLs built here. Every URL must be released with [`revoke_blob_url`]
//! once it is no longer displayed.

use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur during Blob URL creation.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Wrap `bytes` in a `Blob` of type `mime_type` and return its object URL.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn bytes_to_blob_url(bytes: &[u8], mime_type: &str) -> Result<String, RasterError> {
    let uint8_array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    Ok(url)
}

/// Object URL for displaying the uploaded file as-is.
///
/// The MIME type is sniffed from the bytes; unknown containers fall
/// back to `application/octet-stream` and the browser sniffs again.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn preview_blob_url(bytes: &[u8]) -> Result<String, RasterError> {
    let mime = resizer_core::guess_mime_type(bytes).unwrap_or("application/octet-stream");
    bytes_to_blob_url(bytes, mime)
}

/// Revoke a Blob URL previously created by [`bytes_to_blob_url`].
///
/// Best-effort: failures are silently ignored since the URL may have
/// already been revoked or garbage collected.
pub fn revoke_blob_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}
