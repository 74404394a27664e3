//! Image upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdUpload;

/// Image extensions accepted from a drop.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "jfif", "bmp", "webp", "gif"];

/// Check whether a filename has an allowed image extension.
fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext))
    })
}

/// Where a file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileSource {
    /// The `accept="image/*"` picker, which has already filtered by type.
    Picker,
    /// A drag-and-drop, which bypasses the picker's filter.
    Drop,
}

/// Whether a file named `name` is forwarded to the decoder.
fn accepts_file(name: &str, source: FileSource) -> bool {
    match source {
        FileSource::Picker => true,
        FileSource::Drop => has_allowed_extension(name),
    }
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the raw file bytes and filename once a file is read.
    on_upload: EventHandler<(Vec<u8>, String)>,
}

/// Upload button plus drop zone.
///
/// The first file from the picker or a drop is read and forwarded to
/// `on_upload`. Picked files go straight through; dropped files are
/// checked by extension. Whether the bytes really are an image is
/// decided by the decoder.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    // Shared by the picker and drop paths.
    let process_files = move |files: Vec<FileData>, source: FileSource| async move {
        if let Some(file) = files.first() {
            let name = file.name();
            if !accepts_file(&name, source) {
                error.set(Some(format!("Unsupported file type: {name}")));
                return;
            }
            match file.read_bytes().await {
                Ok(bytes) => {
                    error.set(None);
                    props.on_upload.call((bytes.to_vec(), name));
                }
                Err(e) => {
                    tracing::warn!(%name, error = %e, "file read failed");
                    error.set(Some(format!("Failed to read file: {e}")));
                }
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files(), FileSource::Picker).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files(), FileSource::Drop).await;
    };

    let zone_class = if dragging() {
        "upload-zone upload-zone-active"
    } else {
        "upload-zone"
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            if let Some(ref err) = error() {
                p { class: "text-error", "{err}" }
            }

            label { r#for: "image-input", class: "btn btn-outline",
                Icon { icon: LdUpload, width: 16, height: 16 }
                " Upload Image"
            }
            input {
                r#type: "file",
                id: "image-input",
                accept: "image/*",
                class: "hidden",
                onchange: handle_files,
            }

            p { class: "text-muted text-small", "or drop a PNG, JPEG, BMP, WebP, or GIF here" }
        }
    }
}
