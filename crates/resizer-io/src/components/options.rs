//! Resize and output controls.
//!
//! The component is a pure view over an [`OptionsView`] snapshot; every
//! user change is reported as a [`SessionEdit`] that the owner applies to
//! its [`Session`].

use dioxus::prelude::*;
use resizer_core::{Filter, OutputFormat, Quality, ResizeUnit, Session, parse_dimension};

/// The subset of [`Session`] the controls display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsView {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
    pub format: OutputFormat,
    pub filter: Filter,
    pub unit: ResizeUnit,
    pub aspect_ratio_locked: bool,
}

impl OptionsView {
    /// Snapshot of `session`, or `None` until an image is loaded. The
    /// controls are hidden while there is nothing to resize.
    #[must_use]
    pub const fn from_session(session: &Session) -> Option<Self> {
        if !session.is_loaded() {
            return None;
        }
        Some(Self {
            width: session.resize_width(),
            height: session.resize_height(),
            quality: session.quality(),
            format: session.format(),
            filter: session.filter(),
            unit: session.resize_unit(),
            aspect_ratio_locked: session.aspect_ratio_locked(),
        })
    }
}

/// A single user edit from the options panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEdit {
    Width(i64),
    Height(i64),
    Quality(i64),
    Format(OutputFormat),
    Filter(Filter),
    Unit(ResizeUnit),
    ToggleAspectLock,
}

impl SessionEdit {
    /// Route the edit to the matching [`Session`] handler.
    pub fn apply(self, session: &mut Session) {
        match self {
            Self::Width(w) => session.set_width(w),
            Self::Height(h) => session.set_height(h),
            Self::Quality(q) => session.set_quality(q),
            Self::Format(f) => session.set_format(f),
            Self::Filter(f) => session.set_filter(f),
            Self::Unit(u) => session.set_resize_unit(u),
            Self::ToggleAspectLock => session.toggle_aspect_ratio_lock(),
        }
    }
}

/// Props for the [`OptionsPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct OptionsPanelProps {
    /// Current values (read-only).
    view: OptionsView,
    /// Fired once per user change.
    on_edit: EventHandler<SessionEdit>,
}

/// Width/height inputs, aspect lock, unit, quality, format, and filter.
#[component]
pub fn OptionsPanel(props: OptionsPanelProps) -> Element {
    let view = props.view;
    let on_edit = props.on_edit;

    let suffix = match view.unit {
        ResizeUnit::Pixels => "px",
        ResizeUnit::Percentage => "%",
    };

    let format_options: Vec<(&str, &str)> = OutputFormat::ALL
        .iter()
        .map(|f| (f.extension(), f.label()))
        .collect();
    let filter_options: Vec<(&str, &str)> =
        Filter::ALL.iter().map(|f| (f.key(), f.label())).collect();
    let unit_options: Vec<(&str, &str)> =
        ResizeUnit::ALL.iter().map(|u| (u.key(), u.label())).collect();

    rsx! {
        div { class: "options",
            h2 { class: "section-title", "Resize" }
            div { class: "options-row",
                {render_number("width", "Width", view.width, suffix, move |w| {
                    on_edit.call(SessionEdit::Width(w));
                })}
                {render_number("height", "Height", view.height, suffix, move |h| {
                    on_edit.call(SessionEdit::Height(h));
                })}
            }
            {render_toggle(
                "aspect-ratio",
                "Lock aspect ratio",
                view.aspect_ratio_locked,
                move |_| on_edit.call(SessionEdit::ToggleAspectLock),
            )}
            {render_select(
                "resize-unit",
                "Unit",
                &unit_options,
                view.unit.key(),
                move |value| match value.parse::<ResizeUnit>() {
                    Ok(u) => on_edit.call(SessionEdit::Unit(u)),
                    Err(e) => tracing::warn!(%e, "unit select"),
                },
            )}

            h2 { class: "section-title", "Output" }
            {render_slider(
                "quality",
                "Quality",
                i64::from(view.quality.get()),
                i64::from(Quality::MIN),
                i64::from(Quality::MAX),
                move |q| on_edit.call(SessionEdit::Quality(q)),
            )}
            if view.format.is_lossless() {
                p { class: "text-muted text-small",
                    "{view.format.label()} is lossless; quality has no effect."
                }
            }
            {render_select(
                "format",
                "Format",
                &format_options,
                view.format.extension(),
                move |value| match value.parse::<OutputFormat>() {
                    Ok(f) => on_edit.call(SessionEdit::Format(f)),
                    Err(e) => tracing::warn!(%e, "format select"),
                },
            )}
            {render_select(
                "filter",
                "Filter",
                &filter_options,
                view.filter.key(),
                move |value| match value.parse::<Filter>() {
                    Ok(f) => on_edit.call(SessionEdit::Filter(f)),
                    Err(e) => tracing::warn!(%e, "filter select"),
                },
            )}
        }
    }
}

/// Render a labeled numeric input. Text that is not a number is dropped,
/// leaving the stored value unchanged.
fn render_number(
    id: &str,
    label: &str,
    value: u32,
    suffix: &str,
    on_input: impl Fn(i64) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();
    let suffix = suffix.to_string();

    rsx! {
        div { class: "field",
            label { r#for: "{id}", class: "field-label", "{label}" }
            div { class: "field-input",
                input {
                    r#type: "number",
                    id: "{id}",
                    min: "1",
                    value: "{value}",
                    oninput: move |e| {
                        let text = e.value();
                        match parse_dimension(&text) {
                            Some(v) => on_input(v),
                            None => tracing::debug!(input = %text, "ignoring non-numeric dimension"),
                        }
                    },
                }
                span { class: "text-muted", "{suffix}" }
            }
        }
    }
}

/// Render a labeled integer range slider.
fn render_slider(
    id: &str,
    label: &str,
    value: i64,
    min: i64,
    max: i64,
    on_input: impl Fn(i64) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();

    rsx! {
        div { class: "field",
            div { class: "field-header",
                label { r#for: "{id}", class: "field-label", "{label}" }
                span { class: "text-muted tabular-nums", "{value}" }
            }
            input {
                r#type: "range",
                id: "{id}",
                min: "{min}",
                max: "{max}",
                step: "1",
                value: "{value}",
                oninput: move |e| {
                    match e.value().parse::<i64>() {
                        Ok(v) => on_input(v),
                        Err(err) => {
                            tracing::warn!("slider parse failure: {err:?} from {:?}", e.value());
                        }
                    }
                },
            }
        }
    }
}

/// Render a labeled checkbox.
fn render_toggle(
    id: &str,
    label: &str,
    checked: bool,
    on_change: impl Fn(bool) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();

    rsx! {
        div { class: "field field-inline",
            input {
                r#type: "checkbox",
                id: "{id}",
                checked: checked,
                onchange: move |e| {
                    on_change(e.checked());
                },
            }
            label { r#for: "{id}", class: "field-label", "{label}" }
        }
    }
}

/// Render a labeled select dropdown.
fn render_select(
    id: &str,
    label: &str,
    options: &[(&str, &str)],
    selected: &str,
    on_change: impl Fn(String) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();
    let options: Vec<(String, String)> = options
        .iter()
        .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
        .collect();
    let selected = selected.to_string();

    rsx! {
        div { class: "field",
            label { r#for: "{id}", class: "field-label", "{label}" }
            select {
                id: "{id}",
                value: "{selected}",
                onchange: move |e| {
                    on_change(e.value());
                },

                for (value, display) in options.iter() {
                    option {
                        value: "{value}",
                        selected: value == &selected,
                        "{display}"
                    }
                }
            }
        }
    }
}
