use dioxus::prelude::*;

use super::use_view_state;

/// Page chrome shared by the two editors: a back button, the title of the
/// open form, and a save button. Going back discards the draft.
#[component]
pub fn FormFrame(
    save_label: String,
    can_save: bool,
    on_save: EventHandler<()>,
    children: Element,
) -> Element {
    let mut view = use_view_state();
    let title = view.read().form().title();

    rsx! {
        div {
            class: "form-page",
            header {
                class: "form-header",
                div {
                    class: "form-header-start",
                    button {
                        class: "icon-btn",
                        title: "Back",
                        onclick: move |_| view.write().close_form(),
                        "\u{2190}"
                    }
                    h1 { class: "form-title", "{title}" }
                }
                button {
                    class: "btn btn-primary",
                    disabled: !can_save,
                    onclick: move |_| on_save.call(()),
                    "{save_label}"
                }
            }
            main {
                class: "form-body",
                div {
                    class: "form-card",
                    {children}
                }
            }
        }
    }
}
