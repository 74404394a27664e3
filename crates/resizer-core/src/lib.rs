//! resizer-core: session state and image export (sans-IO).
//!
//! Holds the state of one resizer page view and the pure transitions
//! the UI drives: upload -> decode -> edit dimensions and options ->
//! export (resize, filter, encode) -> reset.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. All browser interaction
//! lives in `resizer-io`; file access lives in `resizer-cli`.

pub mod decode;
pub mod encode;
pub mod export;
pub mod filter;
pub mod session;
pub mod types;

pub use decode::{DecodedImage, decode_image, guess_mime_type};
pub use export::{
    EXPORT_BASENAME, ExportConfig, ExportSizing, ExportedImage, FIXED_EXPORT_SIZE, export,
};
pub use session::{
    MAX_DIMENSION, Session, SourceImage, UploadOutcome, UploadTicket, parse_dimension,
};
pub use types::{
    Dimensions, Filter, OutputFormat, ParseOptionError, Quality, ResizeUnit, ResizerError,
    RgbaImage,
};
