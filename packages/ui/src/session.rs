//! Session context for the UI.

use chrono::Utc;
use dioxus::prelude::*;
use store::{reconcile_with_directory, DirectoryEntry, Session};

use crate::device::make_session_store;
use crate::hub::{use_config, use_hub_data};

/// The current session. Every change is written to device storage.
pub fn use_session() -> Signal<Session> {
    use_context::<Signal<Session>>()
}

/// Record a successful login.
pub fn log_in(session: &mut Signal<Session>, phone: &str, entry: &DirectoryEntry) {
    let next = session.peek().logged_in_as(phone, entry, Utc::now());
    tracing::info!(%phone, is_admin = next.is_admin, "logged in");
    session.set(next);
}

pub fn log_out(session: &mut Signal<Session>) {
    let next = session.peek().logged_out();
    tracing::info!("logged out");
    session.set(next);
}

/// Provider that rehydrates the session and keeps it in step with the directory.
///
/// Must sit inside [`HubProvider`](crate::HubProvider).
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let config = use_config();
    let data = use_hub_data();
    let mut session = use_signal(|| make_session_store(&config).load());
    use_context_provider(|| session);

    // Directory pushes are authoritative for the admin flag.
    use_effect(move || {
        let current = session.peek().clone();
        let snapshot = data.read();
        let next = reconcile_with_directory(current.clone(), &snapshot.directory);
        drop(snapshot);
        if next != current {
            session.set(next);
        }
    });

    use_effect(move || {
        let current = session();
        if let Err(e) = make_session_store(&config).save(&current) {
            tracing::warn!("Could not save session: {e}");
        }
    });

    use_effect(move || {
        let scale = session.read().font_scale;
        document::eval(&format!(
            "document.documentElement.style.fontSize = '{scale}rem';"
        ));
    });

    rsx! {
        {children}
    }
}
