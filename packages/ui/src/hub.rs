//! Hub context: the dispatcher, the config, and the latest feed snapshots.

use dioxus::prelude::*;
use futures::StreamExt;
use store::{Announcement, Course, DeviceStore, Directory, HubConfig};

use crate::alert::{raise_alert, AlertLevel, Alerts};
use crate::device::{make_document_store, DeviceKv};

/// The dispatcher the views share, over the board saved on this device.
pub type AppHub = api::Hub<DeviceStore<DeviceKv>>;

/// Latest snapshot of each feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HubData {
    pub announcements: Vec<Announcement>,
    pub courses: Vec<Course>,
    pub directory: Directory,
    /// Set by the first courses push; the shell shows a loading screen until then.
    pub courses_loaded: bool,
}

pub fn use_hub() -> AppHub {
    use_context::<AppHub>()
}

pub fn use_hub_data() -> Signal<HubData> {
    use_context::<Signal<HubData>>()
}

pub fn use_config() -> HubConfig {
    use_context::<HubConfig>()
}

/// Provides [`AppHub`], [`HubConfig`], [`HubData`] and the alert queue.
///
/// The three feeds are watched from tasks owned by this component, so they
/// are unsubscribed when it unmounts.
#[component]
pub fn HubProvider(config: HubConfig, children: Element) -> Element {
    let hub = use_context_provider(|| AppHub::new(make_document_store(&config)));
    let admins = config.directory.admins.clone();
    use_context_provider(|| config);

    let mut data = use_signal(HubData::default);
    use_context_provider(|| data);
    let mut alerts = use_signal(Alerts::default);
    use_context_provider(|| alerts);

    use_hook(move || {
        let seeding = hub.clone();
        spawn(async move {
            if let Err(e) = seeding.seed_admins(&admins).await {
                raise_alert(&mut alerts, AlertLevel::Error, &format!("Could not set up admins: {e}"));
            }
        });

        match hub.watch_announcements() {
            Ok(mut feed) => {
                spawn(async move {
                    while let Some(snapshot) = feed.next().await {
                        tracing::debug!(count = snapshot.len(), "announcements pushed");
                        data.write().announcements = snapshot;
                    }
                });
            }
            Err(e) => feed_failed(&mut alerts, "announcements", &e),
        }

        match hub.watch_courses() {
            Ok(mut feed) => {
                spawn(async move {
                    while let Some(snapshot) = feed.next().await {
                        tracing::debug!(count = snapshot.len(), "courses pushed");
                        let mut latest = data.write();
                        latest.courses = snapshot;
                        latest.courses_loaded = true;
                    }
                });
            }
            Err(e) => feed_failed(&mut alerts, "courses", &e),
        }

        match hub.watch_directory() {
            Ok(mut feed) => {
                spawn(async move {
                    while let Some(snapshot) = feed.next().await {
                        tracing::debug!(count = snapshot.len(), "directory pushed");
                        data.write().directory = snapshot;
                    }
                });
            }
            Err(e) => feed_failed(&mut alerts, "directory", &e),
        }
    });

    rsx! {
        {children}
    }
}

fn feed_failed(alerts: &mut Signal<Alerts>, feed: &str, error: &store::StoreError) {
    tracing::error!("Could not watch {feed}: {error}");
    raise_alert(alerts, AlertLevel::Error, &format!("Could not load {feed}"));
}
