use dioxus::prelude::*;
use store::{Announcement, AnnouncementDraft};

use super::{use_view_state, FormFrame};
use crate::alert::{raise_alert, use_alerts, AlertLevel};
use crate::hub::{use_config, use_hub};
use crate::image_attach::downscale_to_data_url;

/// Full-screen editor for a new or existing announcement.
#[component]
pub fn AnnouncementForm(existing: Option<Announcement>) -> Element {
    let hub = use_hub();
    let config = use_config();
    let mut view = use_view_state();
    let mut alerts = use_alerts();

    let initial = existing
        .as_ref()
        .map(AnnouncementDraft::from_announcement)
        .unwrap_or_default();
    let mut draft = use_signal(|| initial);
    let mut saving = use_signal(|| false);
    let mut attaching = use_signal(|| false);
    let existing_id = existing.as_ref().map(|a| a.id.clone());

    let max_width = config.images.max_width;
    let quality = config.images.jpeg_quality;

    let attach = move |evt: FormEvent| async move {
        let Some(engine) = evt.files() else {
            return;
        };
        let Some(name) = engine.files().into_iter().next() else {
            return;
        };
        attaching.set(true);
        match engine.read_file(&name).await {
            Some(bytes) => match downscale_to_data_url(&bytes, max_width, quality) {
                Ok(data_url) => draft.write().image = Some(data_url),
                Err(e) => {
                    tracing::warn!(file = %name, "Image rejected: {e}");
                    raise_alert(&mut alerts, AlertLevel::Error, &e.to_string());
                }
            },
            None => raise_alert(&mut alerts, AlertLevel::Error, "Could not read the selected file"),
        }
        attaching.set(false);
    };

    let save = move |_: ()| {
        if saving() {
            return;
        }
        let hub = hub.clone();
        let existing_id = existing_id.clone();
        let current = draft();
        saving.set(true);
        spawn(async move {
            match hub.save_announcement(existing_id.as_deref(), &current).await {
                Ok(()) => view.write().close_form(),
                Err(e) => raise_alert(&mut alerts, AlertLevel::Error, &format!("Save failed: {e}")),
            }
            saving.set(false);
        });
    };

    let current = draft();
    let can_save = current.is_complete() && !saving() && !attaching();
    let save_label = match (existing.is_some(), saving()) {
        (_, true) => "Saving...",
        (true, false) => "Update",
        (false, false) => "Publish",
    };

    rsx! {
        FormFrame {
            save_label: save_label,
            can_save: can_save,
            on_save: save,

            div {
                class: "form-row",
                label { class: "field-label", "Title" }
                input {
                    class: "field-input strong",
                    placeholder: "A headline people will notice",
                    value: "{current.title}",
                    oninput: move |evt: FormEvent| draft.write().title = evt.value(),
                }
            }

            div {
                class: "form-row",
                label { class: "field-label", "Picture" }
                div {
                    class: "image-slot",
                    if let Some(image) = current.image.as_ref() {
                        img { class: "image-preview", src: "{image}", alt: "Preview" }
                        button {
                            class: "image-remove",
                            title: "Remove picture",
                            onclick: move |_| draft.write().image = None,
                            "\u{2715}"
                        }
                    } else {
                        label {
                            class: "image-picker",
                            if attaching() { "Processing..." } else { "Choose a picture" }
                            input {
                                r#type: "file",
                                accept: "image/*",
                                class: "hidden",
                                disabled: attaching(),
                                onchange: attach,
                            }
                        }
                    }
                }
            }

            div {
                class: "form-row",
                label { class: "field-label", "Details" }
                textarea {
                    class: "field-input",
                    rows: 12,
                    placeholder: "Everything members need to know",
                    value: "{current.body}",
                    oninput: move |evt: FormEvent| draft.write().body = evt.value(),
                }
            }
        }
    }
}
