//! Client-side data layer for the community hub: domain models, the
//! document store boundary with its live snapshot feeds, the device-backed
//! store that keeps the board across reloads, local key/value storage, and
//! the session record.

pub mod config;
pub mod document;
pub mod error;
pub mod local;
pub mod models;
pub mod session;

mod memory;
pub use memory::{MemoryKv, MemoryStore};

mod device_store;
pub use device_store::DeviceStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileKv;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod web_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use web_storage::WebStorageKv;

pub use config::{DirectoryConfig, DocumentsConfig, HubConfig};
pub use document::{Collection, DocumentStore, MemberField, SnapshotSender, Subscription};
pub use error::StoreError;
pub use local::{KeyValueStore, LocalStorage};
pub use models::{
    Announcement, AnnouncementDraft, Course, CourseDraft, Directory, DirectoryEntry, MemberSet,
    UserPatch,
};
pub use session::{reconcile, reconcile_with_directory, Session, SessionStore};
