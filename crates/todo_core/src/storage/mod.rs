//! Durable key-value storage and the snapshot persistence gateway.
//!
//! # Responsibility
//! - Abstract the local key-value store behind `KeyValueStore`.
//! - Own the only path that reads or writes persisted snapshots.
//!
//! # Invariants
//! - The domain store talks to `PersistenceGateway`, never to a store.
//! - Gateway failures are logged and swallowed at its boundary.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gateway;
pub mod kv;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by key-value stores and snapshot encoding.
#[derive(Debug)]
pub enum StorageError {
    /// Backing database failure.
    Db(DbError),
    /// Snapshot could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Store refused the operation for a non-database reason.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "snapshot serialization failed: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
