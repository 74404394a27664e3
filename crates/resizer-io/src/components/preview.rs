//! Preview of the uploaded image with the selected filter applied.

use dioxus::prelude::*;
use resizer_core::{Dimensions, Filter};

/// Props for the [`Preview`] component.
#[derive(Props, Clone, PartialEq)]
pub struct PreviewProps {
    /// Blob URL of the uploaded file.
    url: String,
    /// Intrinsic size of the uploaded image.
    original: Dimensions,
    /// Filter shown on the preview (via CSS) and baked into the export.
    filter: Filter,
}

/// Renders the uploaded image with the filter applied as a CSS filter,
/// so the preview updates without re-rendering pixels in Rust.
#[component]
pub fn Preview(props: PreviewProps) -> Element {
    let css = props.filter.css();

    rsx! {
        div { class: "preview",
            h2 { class: "section-title", "Preview" }
            img {
                id: "preview",
                src: "{props.url}",
                alt: "Preview",
                class: "preview-image",
                style: "filter: {css}",
            }
            p { id: "image-dimensions", class: "text-muted",
                "Original Dimensions: {props.original}"
            }
        }
    }
}
