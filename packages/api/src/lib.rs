//! # API crate: request functions the hub views call
//!
//! Every user action in the client goes through [`Hub`], a thin dispatcher
//! over a [`store::DocumentStore`]. Each method issues exactly one remote
//! write (or one lookup) and returns once the store accepts or rejects it.
//! Nothing is applied locally: the effect becomes visible when the store
//! pushes the next snapshot through the matching feed.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`announcements`] | Publish, edit, delete, and like/unlike announcements |
//! | [`courses`] | Create, edit, delete courses; enroll and cancel enrollment |
//! | [`users`] | Directory lookup, registration, renaming, and admin seeding |
//! | [`error`] | [`ApiError`] returned by every request |
//!
//! ## Semantics
//!
//! - Membership changes are set-add / set-remove, so repeating a click is harmless.
//! - Edits overwrite fields; deletes remove the whole document, including
//!   any likes or enrollments stored on it.
//! - Drafts that fail validation are rejected with [`ApiError::Incomplete`]
//!   before anything is sent.
//! - Failures are logged with `tracing::error!` and returned. There is no retry.

use store::{Announcement, Course, Directory, DocumentStore, StoreError, Subscription};

pub mod announcements;
pub mod courses;
pub mod error;
pub mod users;

pub use error::ApiError;

/// Request dispatcher bound to one document store.
#[derive(Clone, Debug)]
pub struct Hub<S> {
    store: S,
}

impl<S: DocumentStore> Hub<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Live announcements, newest first.
    pub fn watch_announcements(&self) -> Result<Subscription<Vec<Announcement>>, StoreError> {
        self.store.watch_announcements()
    }

    /// Live courses, soonest first.
    pub fn watch_courses(&self) -> Result<Subscription<Vec<Course>>, StoreError> {
        self.store.watch_courses()
    }

    /// Live user directory.
    pub fn watch_directory(&self) -> Result<Subscription<Directory>, StoreError> {
        self.store.watch_directory()
    }
}

/// Log a failed request and hand the error back.
pub(crate) fn logged<T>(action: &str, result: Result<T, StoreError>) -> Result<T, ApiError> {
    result.map_err(|e| {
        tracing::error!("{action} failed: {e}");
        ApiError::Store(e)
    })
}
