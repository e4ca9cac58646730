use dioxus::prelude::*;

use super::ModalOverlay;

/// Yes/no question before a destructive or binding action.
#[component]
pub fn ConfirmDialog(
    title: String,
    #[props(default)] message: String,
    confirm_label: String,
    #[props(default)] danger: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
    children: Element,
) -> Element {
    let confirm_class = if danger { "btn btn-danger" } else { "btn btn-primary" };

    rsx! {
        ModalOverlay {
            on_close: move |_| on_cancel.call(()),
            div {
                class: "dialog",
                h2 { class: if danger { "dialog-title danger" } else { "dialog-title" }, "{title}" }
                if !message.is_empty() {
                    p { class: "dialog-message", "{message}" }
                }
                {children}
                div {
                    class: "dialog-actions",
                    button {
                        class: "btn btn-ghost",
                        onclick: move |_| on_cancel.call(()),
                        "Back"
                    }
                    button {
                        class: "{confirm_class}",
                        onclick: move |_| on_confirm.call(()),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}

/// Read-only labelled value inside a dialog.
#[component]
pub fn DialogField(label: String, value: String, #[props(default)] emphasis: bool) -> Element {
    rsx! {
        div {
            class: "dialog-field",
            label { class: "field-label", "{label}" }
            input {
                class: if emphasis { "field-input readonly emphasis" } else { "field-input readonly" },
                readonly: true,
                value: "{value}",
            }
        }
    }
}
