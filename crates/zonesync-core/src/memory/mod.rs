//! Identifier memory
//!
//! Providers hand back an opaque identifier for every flat record they
//! list or create. In-place update and targeted delete need that
//! identifier later, so the population pipeline records every
//! (record key, content, identifier) triple here and the apply pipeline
//! looks them up.
//!
//! The store is owned by the caller and scoped to one sync session:
//! populate fills it, apply of the same session consults it, nothing is
//! persisted. Running apply without a prior populate is legal; every
//! lookup then misses and every change degrades to create+delete.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::record::RecordKey;

#[derive(Debug, Default)]
struct Inner {
    id_by_value: HashMap<RecordKey, HashMap<String, String>>,
    all_ids: HashMap<RecordKey, Vec<String>>,
}

/// Concurrency-safe map from (logical record, content) to the
/// provider-assigned identifier
///
/// One coarse mutex guards both maps; every access is a short map
/// read/write and the lock is never held across a provider call.
#[derive(Debug, Default)]
pub struct RememberedIds {
    inner: Mutex<Inner>,
}

impl RememberedIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the identifier the provider assigned to one value of a
    /// logical record
    ///
    /// Overwrites any earlier identifier for the same (key, content)
    /// pair and appends to the per-key identifier list used by
    /// [`RememberedIds::has_unique_ids`].
    pub fn remember(&self, key: &RecordKey, content: &str, identifier: &str) {
        let mut inner = self.lock();
        inner
            .id_by_value
            .entry(key.clone())
            .or_default()
            .insert(content.to_string(), identifier.to_string());
        inner
            .all_ids
            .entry(key.clone())
            .or_default()
            .push(identifier.to_string());
    }

    /// Look up the identifier for one value of a logical record
    ///
    /// Absent is a normal outcome: it means "no known identifier, the
    /// provider must resolve by content", never an error.
    pub fn get(&self, key: &RecordKey, content: &str) -> Option<String> {
        self.lock()
            .id_by_value
            .get(key)
            .and_then(|by_content| by_content.get(content))
            .cloned()
    }

    /// Whether every identifier seen for this record is distinct
    ///
    /// Update is preferred over delete+create whenever possible: it
    /// avoids the window during which a value does not exist, and it
    /// avoids providers that reorder or partially fail a delete+create
    /// pair. Some providers, however, derive the identifier from the
    /// record's name alone, so two values of one record report the same
    /// identifier and an update is ambiguous about which value it would
    /// replace. Update is therefore only attempted when all identifiers
    /// recorded for the key are unique, which a single-value record
    /// satisfies trivially.
    pub fn has_unique_ids(&self, key: &RecordKey) -> bool {
        let inner = self.lock();
        let ids = inner.all_ids.get(key).map(Vec::as_slice).unwrap_or(&[]);
        let distinct: HashSet<&String> = ids.iter().collect();
        distinct.len() == ids.len()
    }

    /// Every identifier recorded for the key, duplicates included
    pub fn get_all_ids(&self, key: &RecordKey) -> Vec<String> {
        self.lock().all_ids.get(key).cloned().unwrap_or_default()
    }

    /// Number of logical records with at least one remembered identifier
    pub fn len(&self) -> usize {
        self.lock().all_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().all_ids.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoning panic cannot leave the maps half-written; keep
        // serving the data we have.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
