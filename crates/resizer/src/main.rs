use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdMoon, LdSun};
use resizer_core::{Session, UploadOutcome};
use resizer_io::{ExportPanel, FileUpload, OptionsPanel, OptionsView, Preview, SessionEdit, raster};

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(app);
}

/// Drop the current preview URL, if any, and release its Blob.
fn release_preview(mut preview_url: Signal<Option<String>>) {
    let old = preview_url.write().take();
    if let Some(url) = old {
        raster::revoke_blob_url(&url);
    }
}

/// Root application component.
///
/// All page state lives in one [`Session`] signal. The upload handler
/// starts a decode keyed to the session's upload generation, so a slow
/// decode for an earlier file can never overwrite a later one.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut session = use_signal(Session::new);
    let mut preview_url = use_signal(|| Option::<String>::None);

    // --- File upload handler ---
    let on_upload = move |(bytes, name): (Vec<u8>, String)| {
        let bytes: Rc<[u8]> = bytes.into();
        let ticket = session.write().begin_upload(name, Rc::clone(&bytes));
        release_preview(preview_url);

        spawn(async move {
            // Yield so the loading state paints before the decode blocks
            // the thread.
            gloo_timers::future::TimeoutFuture::new(0).await;

            let decoded = resizer_core::decode_image(&bytes);
            let outcome = session.write().complete_upload(ticket, decoded);

            match outcome {
                UploadOutcome::Loaded(dimensions) => match raster::preview_blob_url(&bytes) {
                    Ok(url) => {
                        release_preview(preview_url);
                        preview_url.set(Some(url));
                        tracing::info!(%dimensions, "image loaded");
                    }
                    Err(e) => tracing::warn!(error = %e, "preview URL creation failed"),
                },
                UploadOutcome::Failed(message) => tracing::warn!(%message, "upload rejected"),
                UploadOutcome::Stale => {}
            }
        });
    };

    // --- Option edit handler ---
    let on_edit = move |edit: SessionEdit| {
        edit.apply(&mut session.write());
    };

    // --- Reset handler ---
    let on_reset = move |()| {
        session.write().reset();
        release_preview(preview_url);
    };

    let (view, original, filter, loading, load_error, dark_mode) = {
        let s = session.read();
        (
            OptionsView::from_session(&s),
            s.original(),
            s.filter(),
            s.is_loading(),
            s.load_error().map(str::to_owned),
            s.dark_mode(),
        )
    };
    let theme = if dark_mode { "dark" } else { "light" };
    let preview = preview_url().zip(original);

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "app", "data-theme": "{theme}",
            button {
                id: "theme-toggle",
                class: "theme-toggle",
                aria_label: "Toggle dark mode",
                onclick: move |_| session.write().toggle_dark_mode(),
                if dark_mode {
                    Icon { icon: LdSun, width: 18, height: 18 }
                } else {
                    Icon { icon: LdMoon, width: 18, height: 18 }
                }
            }

            header { class: "header",
                h1 { class: "title", "Image Resizer" }
                p { class: "text-muted text-small",
                    "Resize, filter, and convert images without leaving the browser"
                }
            }

            main { class: "layout",
                section { class: "panel",
                    FileUpload { on_upload }

                    if let Some(ref err) = load_error {
                        div { class: "error-box",
                            p { class: "error-title", "Could not load image" }
                            p { class: "text-small", "{err}" }
                        }
                    }

                    if loading {
                        p { class: "text-muted", "Decoding..." }
                    }
                    if let Some((url, original)) = preview {
                        Preview { url, original, filter }
                    }
                }

                section { class: "panel",
                    if let Some(view) = view {
                        OptionsPanel { view, on_edit }
                    }
                    ExportPanel { session, on_reset }
                }
            }
        }
    }
}
