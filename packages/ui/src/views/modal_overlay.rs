use dioxus::prelude::*;

/// A full-screen backdrop that centers its children in a card.
///
/// When `dismissable`, clicking the backdrop or pressing Escape triggers
/// `on_close`. Blocking alerts turn this off so only their own button closes them.
#[component]
pub fn ModalOverlay(
    on_close: EventHandler<()>,
    #[props(default = true)] dismissable: bool,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: if dismissable { "modal-backdrop" } else { "modal-backdrop blocking" },
            role: "dialog",
            tabindex: "-1",
            onclick: move |_| {
                if dismissable {
                    on_close.call(());
                }
            },
            onkeydown: move |evt: KeyboardEvent| {
                if dismissable && evt.key() == Key::Escape {
                    on_close.call(());
                }
            },
            div {
                class: "modal-card",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                {children}
            }
        }
    }
}
