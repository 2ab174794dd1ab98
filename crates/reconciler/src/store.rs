//! In-memory record of the remote checks we own
//!
//! Every entry stands for a remote check that carries the ownership tag and
//! whose last write is believed to have succeeded. Entries are only added
//! after a successful create (or adoption during sync) and only removed after
//! a successful delete.

use crate::types::OwnedCheck;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identity -> owned check, behind a single lock.
///
/// The lock is never held across a remote call, so reconciling two
/// identities concurrently only contends on the map itself.
#[derive(Debug, Default)]
pub struct ReconciliationStore {
    checks: Mutex<HashMap<String, OwnedCheck>>,
}

impl ReconciliationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for `identity`.
    pub fn lookup(&self, identity: &str) -> Option<OwnedCheck> {
        self.guard().get(identity).cloned()
    }

    /// Insert or overwrite the entry for `identity`.
    pub fn put(&self, identity: impl Into<String>, check: OwnedCheck) {
        self.guard().insert(identity.into(), check);
    }

    /// Remove the entry for `identity`, returning it if there was one.
    pub fn remove(&self, identity: &str) -> Option<OwnedCheck> {
        self.guard().remove(identity)
    }

    pub fn size(&self) -> usize {
        self.guard().len()
    }

    /// Snapshot of all entries, ordered by identity.
    pub fn entries(&self) -> Vec<OwnedCheck> {
        let mut entries: Vec<OwnedCheck> = self.guard().values().cloned().collect();
        entries.sort_by(|a, b| a.identity.cmp(&b.identity));
        entries
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<String, OwnedCheck>> {
        // Entries are only ever replaced whole, so a poisoned map is still consistent
        self.checks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
