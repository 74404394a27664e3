//! Dioxus UI components for resizer.
//!
//! Provides the upload drop zone, filtered preview, resize/output
//! options, and the export panel.

mod export;
mod options;
mod preview;
mod upload;

pub use export::ExportPanel;
pub use options::{OptionsPanel, OptionsView, SessionEdit};
pub use preview::Preview;
pub use upload::FileUpload;
