//! Snapshot persistence gateway.
//!
//! # Responsibility
//! - Serialize the full application snapshot under one fixed key.
//! - Convert every storage/encoding failure into a logged no-op for
//!   infallible callers.
//!
//! # Invariants
//! - `save`, `load` and `clear` never panic and never return errors.
//! - `load` yields `None` for a missing key and for unreadable data alike.

use crate::model::snapshot::Snapshot;
use crate::storage::kv::KeyValueStore;
use crate::storage::StorageResult;
use log::{debug, error};

/// Key the snapshot is stored under unless configured otherwise.
pub const STORAGE_KEY: &str = "todoApp";

/// Sole bridge between in-memory state and the durable store.
pub struct PersistenceGateway<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Creates a gateway writing under [`STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    /// Creates a gateway writing under a caller-provided key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes `snapshot`; failures are logged and swallowed.
    pub fn save(&self, snapshot: &Snapshot) {
        if let Err(err) = self.try_save(snapshot) {
            error!(
                "event=snapshot_save module=storage status=error key={} error={}",
                self.key, err
            );
        }
    }

    /// Reads the stored snapshot; failures are logged and reported as `None`.
    pub fn load(&self) -> Option<Snapshot> {
        match self.try_load() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(
                    "event=snapshot_load module=storage status=error key={} error={}",
                    self.key, err
                );
                None
            }
        }
    }

    /// Removes the stored snapshot; failures are logged and swallowed.
    pub fn clear(&self) {
        if let Err(err) = self.try_clear() {
            error!(
                "event=snapshot_clear module=storage status=error key={} error={}",
                self.key, err
            );
        }
    }

    /// Fallible variant of [`PersistenceGateway::save`].
    pub fn try_save(&self, snapshot: &Snapshot) -> StorageResult<()> {
        let encoded = serde_json::to_string(snapshot)?;
        self.store.set(&self.key, &encoded)?;
        debug!(
            "event=snapshot_save module=storage status=ok projects={} todos={} bytes={}",
            snapshot.projects.len(),
            snapshot.todos.len(),
            encoded.len()
        );
        Ok(())
    }

    /// Fallible variant of [`PersistenceGateway::load`].
    pub fn try_load(&self) -> StorageResult<Option<Snapshot>> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!("event=snapshot_load module=storage status=empty");
            return Ok(None);
        };
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        debug!(
            "event=snapshot_load module=storage status=ok projects={} todos={}",
            snapshot.projects.len(),
            snapshot.todos.len()
        );
        Ok(Some(snapshot))
    }

    /// Fallible variant of [`PersistenceGateway::clear`].
    pub fn try_clear(&self) -> StorageResult<()> {
        self.store.remove(&self.key)
    }
}
