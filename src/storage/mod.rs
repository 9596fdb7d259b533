//! Key-value persistence backends.
//!
//! The journal and onboarding stores never touch the filesystem directly. They
//! are handed an implementation of [`KeyValueStore`] at construction, which
//! keeps the persistence medium swappable and lets tests use an in-memory fake.
//!
//! # Module Structure
//!
//! - `memory`: process-local store backed by a `HashMap`
//! - `file`: one JSON document per key inside a data directory

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::errors::StorageError;

/// A string-keyed store of string values.
///
/// Implementations must make `set` all-or-nothing: after a failed `set`, a
/// subsequent `get` for the same key returns the previous value.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Rejects keys that would be unsafe to use as file names.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
