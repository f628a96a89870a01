//! Saved sessions and match history.
//!
//! [`Storage`] is a minimal key/value string store; [`SessionStore`] layers
//! the codebreak data model on top of it as versioned JSON documents.
//! Callers treat every failure here as non-fatal and keep playing with the
//! in-memory state.

use std::io;

use derive_more::{Display, Error, From};

pub use self::{
    session_store::SessionStore,
    storage::{FileStorage, MemoryStorage, Storage},
};

mod session_store;
mod storage;

/// Reasons a storage operation failed.
#[derive(Debug, Display, Error, From)]
pub enum PersistenceError {
    /// Reading or writing the backing file failed.
    #[display("I/O error on {key:?}: {source}")]
    Io {
        /// The key being accessed.
        key: String,
        /// The underlying error.
        source: io::Error,
    },
    /// A stored document could not be encoded or decoded.
    #[display("malformed stored data: {_0}")]
    #[from]
    Json(serde_json::Error),
    /// The key contains characters that cannot be stored.
    #[display("invalid storage key {_0:?}")]
    InvalidKey(#[error(not(source))] String),
    /// The stored document was written by an incompatible version.
    #[display("unsupported format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in storage.
        found: u32,
        /// Version this build reads and writes.
        expected: u32,
    },
}
