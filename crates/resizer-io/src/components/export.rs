//! Export panel component with download and reset buttons.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdRotateCcw};
use resizer_core::{ExportConfig, ExportSizing, FIXED_EXPORT_SIZE, ResizerError, Session};

use crate::download;

/// Props for the [`ExportPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ExportPanelProps {
    /// Session to export from. Read only; reset goes through `on_reset`.
    session: Signal<Session>,
    /// Fired when the user asks to start over.
    on_reset: EventHandler<()>,
}

/// Download and reset buttons.
///
/// Download renders the loaded image and hands it to the browser as a
/// file named `resized-image.<ext>`. By default the export surface is
/// fixed; the "Use chosen size" toggle switches to the dimensions from
/// the options panel.
#[component]
pub fn ExportPanel(props: ExportPanelProps) -> Element {
    let session = props.session;
    let mut export_error = use_signal(|| Option::<String>::None);
    let mut sizing = use_signal(ExportSizing::default);

    let generation = session.read().generation();
    use_effect(use_reactive!(|generation| {
        let _ = generation;
        export_error.set(None);
    }));

    let loaded = session.read().is_loaded();

    let download_click = move |_| {
        let config = ExportConfig { sizing: sizing() };
        let result = resizer_core::export(&session.read(), &config);
        match result {
            Ok(exported) => match download::download_export(&exported) {
                Ok(()) => export_error.set(None),
                Err(e) => export_error.set(Some(format!("Download failed: {e}"))),
            },
            Err(ResizerError::NoImageLoaded) => {}
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                export_error.set(Some(e.to_string()));
            }
        }
    };

    let reset_click = move |_| {
        export_error.set(None);
        props.on_reset.call(());
    };

    let enabled_class = "btn btn-primary";
    let disabled_class = "btn btn-disabled";
    let honor = sizing() == ExportSizing::Requested;

    rsx! {
        div { class: "export",
            h2 { class: "section-title", "Export" }

            if let Some(ref err) = export_error() {
                p { class: "text-error text-small", "{err}" }
            }

            div { class: "field field-inline",
                input {
                    r#type: "checkbox",
                    id: "honor-dimensions",
                    checked: honor,
                    onchange: move |e| {
                        sizing.set(if e.checked() {
                            ExportSizing::Requested
                        } else {
                            ExportSizing::Fixed
                        });
                    },
                }
                label { r#for: "honor-dimensions", class: "field-label", "Use chosen size" }
            }
            if !honor {
                p { class: "text-muted text-small",
                    "Exports are drawn at {FIXED_EXPORT_SIZE}."
                }
            }

            div { class: "button-row",
                button {
                    id: "download-button",
                    class: if loaded { enabled_class } else { disabled_class },
                    disabled: !loaded,
                    onclick: download_click,
                    Icon { icon: LdDownload, width: 16, height: 16 }
                    " Download"
                }
                button {
                    id: "reset-button",
                    class: "btn btn-outline",
                    onclick: reset_click,
                    Icon { icon: LdRotateCcw, width: 16, height: 16 }
                    " Reset"
                }
            }
        }
    }
}
