//! Persistence for projects and platform credentials.
//!
//! A [`KvBackend`] stores opaque strings by key; [`Store`] layers project and
//! token semantics on top of it.

pub mod backend;
pub mod store;

use thiserror::Error;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use store::Store;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage io failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("project {0} not found")]
    ProjectNotFound(uuid::Uuid),
}
