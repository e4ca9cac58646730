use thiserror::Error;

/// Why a request was not applied.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field was blank; nothing was sent.
    #[error("{0} is required")]
    Incomplete(&'static str),

    #[error(transparent)]
    Store(#[from] store::StoreError),
}
