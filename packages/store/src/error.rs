use thiserror::Error;

use crate::document::Collection;

/// Errors raised by document stores and local key/value backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Field updates and membership changes require an existing document.
    #[error("no {collection} document with id {id}")]
    NotFound { collection: Collection, id: String },

    /// The backend could not serve the request at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("local storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored value: {0}")]
    Json(#[from] serde_json::Error),
}
