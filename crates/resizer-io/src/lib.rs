//! resizer-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, Blob URLs for the preview, Blob downloads of
//! exported images, and provides the UI components for the resizer web
//! application.

pub mod components;
pub mod download;
pub mod raster;

pub use components::{ExportPanel, FileUpload, OptionsPanel, OptionsView, Preview, SessionEdit};
pub use download::DownloadError;
pub use raster::RasterError;
