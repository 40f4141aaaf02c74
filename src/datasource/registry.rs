//! The in-memory datasource cache.
//!
//! A single readers-writer lock guards an identity-keyed map of immutable
//! entries. Entries are handed out as `Arc<Datasource>`, so a reader holds
//! the lock only long enough to clone a pointer and a concurrent reload
//! swaps in a new `Arc` without touching the one the reader already has.
//!
//! Lookup by public name is a linear scan. The map is ordered by identity,
//! so when several files share a public name the one with the smallest
//! path wins, for every call against the same contents.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::Datasource;

#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<BTreeMap<PathBuf, Arc<Datasource>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for the datasource's identity.
    ///
    /// Returns the previous entry, if any.
    pub fn put(&self, datasource: Datasource) -> Option<Arc<Datasource>> {
        let identity = datasource.identity().to_path_buf();
        let entry = Arc::new(datasource);
        self.entries.write().insert(identity, entry)
    }

    /// Remove the entry for `identity`. Removing an absent identity is a no-op.
    pub fn remove(&self, identity: &Path) -> Option<Arc<Datasource>> {
        self.entries.write().remove(identity)
    }

    /// Every current entry, ordered by identity.
    pub fn snapshot(&self) -> Vec<Arc<Datasource>> {
        self.entries.read().values().cloned().collect()
    }

    /// First entry, in identity order, whose public name equals `name`.
    pub fn find_by_public_name(&self, name: &str) -> Option<Arc<Datasource>> {
        self.entries
            .read()
            .values()
            .find(|ds| ds.public_name() == name)
            .cloned()
    }

    /// Remove `prefix` and every identity below it, under one write lock.
    ///
    /// Covers a directory that disappears as a whole. Returns the removed
    /// entries in identity order.
    pub fn remove_prefix(&self, prefix: &Path) -> Vec<Arc<Datasource>> {
        let mut entries = self.entries.write();

        // Paths order by component, so everything under `prefix` is one run
        // starting at `prefix` itself.
        let doomed: Vec<PathBuf> = entries
            .range::<Path, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(identity, _)| identity)
            .take_while(|identity| identity.starts_with(prefix))
            .cloned()
            .collect();

        doomed
            .iter()
            .filter_map(|identity| entries.remove(identity))
            .collect()
    }

    pub fn contains(&self, identity: &Path) -> bool {
        self.entries.read().contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
