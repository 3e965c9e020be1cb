//! Version-scoped action cache.
//!
//! Ids handed out by discovery resolve only while the snapshot they were
//! discovered against is current. Any structural change invalidates every
//! entry at once; there is no partial survival across versions.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{CachedAction, CandidateAction};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct ActionCache {
    version: u64,
    entries: HashMap<String, CachedAction>,
}

impl ActionCache {
    pub fn new(version: u64) -> Self {
        Self {
            version,
            entries: HashMap::new(),
        }
    }

    /// Snapshot version the current entries belong to
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register an action discovered against `version` and return its id.
    ///
    /// An action from any other version is not stored; the returned id will
    /// never resolve.
    pub fn insert(&mut self, action: CandidateAction, version: u64) -> CachedAction {
        let cached = CachedAction {
            id: Uuid::now_v7().to_string(),
            action,
            version,
        };
        if version == self.version {
            self.entries.insert(cached.id.clone(), cached.clone());
        } else {
            tracing::debug!(
                cache_version = self.version,
                action_version = version,
                "skipping cache insert for stale version"
            );
        }
        cached
    }

    /// # Errors
    ///
    /// `ActionNotFound` for unknown, expired or foreign ids.
    pub fn lookup(&self, id: &str) -> Result<&CachedAction> {
        self.entries.get(id).ok_or_else(|| {
            ExError::new(ExErrorKind::ActionNotFound)
                .with_op("lookup_action")
                .with_action_id(id)
                .with_snapshot_version(self.version)
                .with_message("action id is unknown or belongs to an earlier snapshot")
        })
    }

    /// Drop every entry and rescope the cache to `new_version`
    pub fn invalidate(&mut self, new_version: u64) {
        self.entries.clear();
        self.version = new_version;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
