use dioxus::prelude::*;
use store::session::{FONT_SCALE_STEP, MAX_FONT_SCALE, MIN_FONT_SCALE};

use super::{use_view_state, ModalOverlay};
use crate::alert::{raise_alert, use_alerts, AlertLevel};
use crate::format::font_label;
use crate::hub::use_hub;
use crate::session::{log_out, use_session};

/// Account and display preferences for the logged-in member.
#[component]
pub fn SettingsTab() -> Element {
    let hub = use_hub();
    let mut session = use_session();
    let mut view = use_view_state();
    let mut alerts = use_alerts();
    let mut editing_name = use_signal(|| false);
    let mut name_input = use_signal(String::new);
    let mut renaming = use_signal(|| false);

    let current = session.read().clone();
    let display_name = current.name.clone().unwrap_or_else(|| "Not set".to_string());
    let phone = current.phone.clone().unwrap_or_default();
    let font_scale = current.font_scale;

    let rename = move |_: MouseEvent| {
        let name = name_input().trim().to_string();
        if name.is_empty() || renaming() {
            return;
        }
        let Some(phone) = session.peek().current_phone().map(str::to_string) else {
            return;
        };
        let hub = hub.clone();
        renaming.set(true);
        spawn(async move {
            match hub.rename_user(&phone, &name).await {
                Ok(()) => {
                    let next = session.peek().renamed(&name);
                    session.set(next);
                    editing_name.set(false);
                }
                Err(e) => raise_alert(&mut alerts, AlertLevel::Error, &format!("Rename failed: {e}")),
            }
            renaming.set(false);
        });
    };

    rsx! {
        div {
            class: "tab-page",
            section {
                h2 { class: "section-title", "Account" }
                div {
                    class: "card",
                    div {
                        class: "settings-row",
                        div {
                            p { class: "card-meta", "Name" }
                            p { class: "card-title", "{display_name}" }
                        }
                        button {
                            class: "btn btn-soft",
                            onclick: move |_| {
                                name_input.set(session.peek().name.clone().unwrap_or_default());
                                editing_name.set(true);
                            },
                            "Change name"
                        }
                    }
                    div {
                        class: "settings-row",
                        div {
                            p { class: "card-meta", "Phone" }
                            p { class: "card-title accent", "{phone}" }
                        }
                    }
                }
            }

            section {
                h2 { class: "section-title", "Display" }
                div {
                    class: "card settings-stack",
                    div {
                        class: "settings-row",
                        span { "Text size" }
                        strong { "{font_label(font_scale)}" }
                    }
                    input {
                        class: "range",
                        r#type: "range",
                        min: "{MIN_FONT_SCALE}",
                        max: "{MAX_FONT_SCALE}",
                        step: "{FONT_SCALE_STEP}",
                        value: "{font_scale}",
                        oninput: move |evt: FormEvent| {
                            if let Ok(scale) = evt.value().parse::<f32>() {
                                let next = session.peek().with_font_scale(scale);
                                session.set(next);
                            }
                        },
                    }
                }
            }

            button {
                class: "btn btn-danger-soft btn-block",
                onclick: move |_| {
                    log_out(&mut session);
                    view.write().on_logout();
                },
                "Log out"
            }

            if editing_name() {
                ModalOverlay {
                    on_close: move |_| editing_name.set(false),
                    div {
                        class: "dialog",
                        h2 { class: "dialog-title", "Change name" }
                        input {
                            class: "field-input",
                            autofocus: true,
                            value: "{name_input}",
                            oninput: move |evt: FormEvent| name_input.set(evt.value()),
                        }
                        div {
                            class: "dialog-actions",
                            button {
                                class: "btn btn-ghost",
                                onclick: move |_| editing_name.set(false),
                                "Cancel"
                            }
                            button {
                                class: "btn btn-primary",
                                disabled: renaming() || name_input().trim().is_empty(),
                                onclick: rename,
                                if renaming() { "Saving..." } else { "Save" }
                            }
                        }
                    }
                }
            }
        }
    }
}
