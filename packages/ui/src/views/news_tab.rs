use dioxus::prelude::*;
use store::Announcement;

use super::{use_view_state, ConfirmDialog};
use crate::alert::{raise_alert, use_alerts, AlertLevel};
use crate::format::{format_timestamp, member_names};
use crate::hub::{use_config, use_hub, use_hub_data};
use crate::session::use_session;
use crate::share_card::{share_card, ShareOutcome, SHARE_CARD_JS};

/// The announcement board. Readable without logging in.
#[component]
pub fn NewsTab() -> Element {
    let hub = use_hub();
    let data = use_hub_data();
    let session = use_session();
    let mut view = use_view_state();
    let mut alerts = use_alerts();
    let mut confirm_delete = use_signal(|| Option::<String>::None);

    let announcements = data.read().announcements.clone();
    let can_manage = session.read().can_manage_content();

    let delete_confirmed = move |_: ()| {
        let Some(id) = confirm_delete.take() else {
            return;
        };
        let hub = hub.clone();
        spawn(async move {
            if let Err(e) = hub.delete_announcement(&id).await {
                raise_alert(&mut alerts, AlertLevel::Error, &format!("Delete failed: {e}"));
            }
        });
    };

    rsx! {
        div {
            class: "tab-page",
            section {
                h2 { class: "section-title", "Latest" }

                if can_manage {
                    button {
                        class: "btn-add",
                        onclick: move |_| view.write().new_announcement(),
                        "+ Publish announcement"
                    }
                }

                if announcements.is_empty() {
                    p { class: "empty-hint", "Nothing has been announced yet." }
                }

                div {
                    class: "card-list",
                    for announcement in announcements {
                        AnnouncementCard {
                            key: "{announcement.id}",
                            announcement: announcement.clone(),
                            on_delete: move |id: String| confirm_delete.set(Some(id)),
                        }
                    }
                }
            }

            if confirm_delete.read().is_some() {
                ConfirmDialog {
                    title: "Delete this announcement?",
                    message: "This cannot be undone.",
                    confirm_label: "Delete",
                    danger: true,
                    on_confirm: delete_confirmed,
                    on_cancel: move |_| confirm_delete.set(None),
                }
            }
        }
    }
}

#[component]
fn AnnouncementCard(announcement: Announcement, on_delete: EventHandler<String>) -> Element {
    let hub = use_hub();
    let config = use_config();
    let data = use_hub_data();
    let session = use_session();
    let mut view = use_view_state();
    let mut alerts = use_alerts();
    let mut liking = use_signal(|| false);
    let mut sharing = use_signal(|| false);

    let current = session.read().clone();
    let phone = current.current_phone().map(str::to_string);
    let liked = phone
        .as_deref()
        .is_some_and(|phone| announcement.is_liked_by(phone));
    let like_count = announcement.liked_by.len();
    let likers = if current.can_manage_content() && !announcement.liked_by.is_empty() {
        Some(member_names(&data.read().directory, &announcement.liked_by))
    } else {
        None
    };
    let published = format_timestamp(announcement.published_at);

    let toggle_like = {
        let announcement = announcement.clone();
        move |_: MouseEvent| {
            let Some(phone) = phone.clone() else {
                return;
            };
            if liking() {
                return;
            }
            let hub = hub.clone();
            let announcement = announcement.clone();
            liking.set(true);
            spawn(async move {
                if let Err(e) = hub.toggle_like(&announcement, &phone).await {
                    raise_alert(&mut alerts, AlertLevel::Error, &format!("Could not update like: {e}"));
                }
                liking.set(false);
            });
        }
    };

    let share = {
        let card = share_card(&announcement, &config.share.link);
        move |_: MouseEvent| {
            if sharing() {
                return;
            }
            let card = card.clone();
            sharing.set(true);
            spawn(async move {
                let mut eval = document::eval(SHARE_CARD_JS);
                let outcome = match eval.send(card) {
                    Ok(()) => match eval.recv::<String>().await {
                        Ok(reply) => ShareOutcome::from_reply(&reply),
                        Err(e) => ShareOutcome::Failed(format!("{e:?}")),
                    },
                    Err(e) => ShareOutcome::Failed(format!("{e:?}")),
                };
                match outcome {
                    ShareOutcome::Shared | ShareOutcome::Cancelled => {}
                    ShareOutcome::Downloaded { link_copied: true } => raise_alert(
                        &mut alerts,
                        AlertLevel::Success,
                        "Card saved and link copied to clipboard",
                    ),
                    ShareOutcome::Downloaded { link_copied: false } => {
                        raise_alert(&mut alerts, AlertLevel::Success, "Card saved")
                    }
                    ShareOutcome::Failed(reason) => {
                        tracing::warn!("Share failed: {reason}");
                        raise_alert(&mut alerts, AlertLevel::Error, "Could not share this announcement");
                    }
                }
                sharing.set(false);
            });
        }
    };

    let edit_target = announcement.clone();
    let delete_id = announcement.id.clone();

    rsx! {
        article {
            class: "card",
            header {
                class: "card-header",
                div {
                    p { class: "card-meta", "{published}" }
                    p { class: "card-title", "{announcement.title}" }
                }
                if current.can_manage_content() {
                    div {
                        class: "card-actions",
                        button {
                            class: "icon-btn",
                            title: "Edit",
                            onclick: move |_| view.write().edit_announcement(edit_target.clone()),
                            "\u{270E}"
                        }
                        button {
                            class: "icon-btn danger",
                            title: "Delete",
                            onclick: move |_| on_delete.call(delete_id.clone()),
                            "\u{1F5D1}"
                        }
                    }
                }
            }

            if let Some(image) = announcement.image.as_ref() {
                img { class: "card-image", src: "{image}", alt: "{announcement.title}" }
            }

            div {
                class: "card-body",
                p { class: "card-text", "{announcement.body}" }
                if let Some(names) = likers {
                    div {
                        class: "card-footnote",
                        span { class: "field-label", "Liked by" }
                        p { "{names}" }
                    }
                }
            }

            footer {
                class: "card-footer",
                button {
                    class: if liked { "like-btn liked" } else { "like-btn" },
                    disabled: !current.can_like() || liking(),
                    onclick: toggle_like,
                    if liked { "\u{2665} " } else { "\u{2661} " }
                    "{like_count}"
                }
                button {
                    class: "btn btn-soft",
                    disabled: sharing(),
                    onclick: share,
                    if sharing() { "Preparing..." } else { "Share" }
                }
            }
        }
    }
}
