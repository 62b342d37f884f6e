use shoplist_crypto::entropy::EntropyError;
use shoplist_crypto::hash::HashError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Bad input shape or size. The message is safe to show to clients.
    #[error("{0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("token generation failed: {0}")]
    Entropy(#[from] EntropyError),

    #[error("database lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;
