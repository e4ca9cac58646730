use dioxus::prelude::*;

use store::HubConfig;
use ui::{AppShell, HubProvider, SessionProvider};

const MAIN_CSS: Asset = asset!("/assets/main.css");
const HUB_TOML: &str = include_str!("../hub.toml");
/// Served from `public/`, so its scope covers the whole app.
const SERVICE_WORKER_PATH: &str = "/sw.js";

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(|| {
        let config = HubConfig::from_toml_or_default(HUB_TOML);
        tracing::info!(admins = config.directory.admins.len(), "loaded {}", HubConfig::filename());
        config
    });

    use_effect(|| {
        document::eval(&register_service_worker_js(SERVICE_WORKER_PATH));
    });

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        HubProvider {
            config: config,
            SessionProvider {
                AppShell {}
            }
        }
    }
}

fn register_service_worker_js(path: &str) -> String {
    format!(
        r#"if ("serviceWorker" in navigator) {{
    navigator.serviceWorker.register("{path}").catch((e) => console.warn("service worker not registered", e));
}}"#
    )
}
