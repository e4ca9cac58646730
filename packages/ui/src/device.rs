//! Storage on the current device: the session record and the saved board.
//!
//! - **Web** (WASM + `web` feature): browser `localStorage` via [`store::WebStorageKv`],
//!   with board documents under a `"<namespace>:"` prefix
//! - **Desktop / Mobile** (native): one file per key under `<data_dir>/community-hub/`,
//!   board documents in a `<namespace>` subdirectory
//! - **WASM without `web`**: in memory only, lost on reload

use store::{DeviceStore, HubConfig, Session, SessionStore};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type DeviceKv = store::WebStorageKv;

#[cfg(not(target_arch = "wasm32"))]
pub type DeviceKv = store::FileKv;

#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type DeviceKv = store::MemoryKv;

/// Create the session store for this platform, keyed and defaulted from `config`.
pub fn make_session_store(config: &HubConfig) -> SessionStore<DeviceKv> {
    let defaults = Session::with_default_font_scale(config.session.default_font_scale);
    SessionStore::new(device_kv(None), &config.session.storage_key).with_defaults(defaults)
}

/// Open the board saved on this device.
pub fn make_document_store(config: &HubConfig) -> DeviceStore<DeviceKv> {
    DeviceStore::open(device_kv(Some(&config.documents.namespace)))
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
fn device_kv(namespace: Option<&str>) -> DeviceKv {
    match namespace {
        Some(namespace) => store::WebStorageKv::with_prefix(namespace),
        None => store::WebStorageKv::new(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn device_kv(namespace: Option<&str>) -> DeviceKv {
    let mut base = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("community-hub");
    if let Some(namespace) = namespace {
        base = base.join(namespace);
    }
    store::FileKv::new(base)
}

#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
fn device_kv(_namespace: Option<&str>) -> DeviceKv {
    store::MemoryKv::new()
}
