use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use super::{Batch, HashStore, Op, Precondition, StoreError, TxOutcome};
use crate::marshal::Fields;

#[derive(Debug, Default)]
struct Inner {
    hashes: HashMap<String, Fields>,
    sets: HashMap<String, HashSet<String>>,
    versions: HashMap<String, u64>,
    interfere: HashSet<String>,
}

impl Inner {
    fn version(&self, key: &str) -> u64 {
        self.versions.get(key).copied().unwrap_or_default()
    }

    fn touch(&mut self, key: &str) {
        *self.versions.entry(key.to_string()).or_default() += 1;
    }

    fn apply(&mut self, batch: &Batch) {
        for op in batch.ops() {
            match op {
                Op::ReplaceHash { key, fields } => {
                    if fields.is_empty() {
                        self.hashes.remove(key);
                    } else {
                        self.hashes.insert(key.clone(), fields.clone());
                    }
                    self.touch(key);
                }
                Op::AddMember { set, member } => {
                    self.sets
                        .entry(set.clone())
                        .or_default()
                        .insert(member.clone());
                    self.touch(set);
                }
                Op::RemoveMember { set, member } => {
                    if let Some(members) = self.sets.get_mut(set) {
                        members.remove(member);
                    }
                    self.touch(set);
                }
            }
        }
    }
}

/// In-process [`HashStore`] with Redis-like watch semantics.
///
/// Every key carries a version that is bumped on write; a watched transaction
/// aborts when the version moved between watch and commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next watched transaction on `key` see a concurrent write
    /// landing between its watch and its commit.
    #[cfg(test)]
    pub(crate) fn simulate_concurrent_write(&self, key: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.interfere.insert(key.to_string());
        }
    }

    /// Raw view of a stored hash, bypassing the trait.
    #[cfg(test)]
    pub(crate) fn hash(&self, key: &str) -> Option<Fields> {
        self.inner.lock().ok()?.hashes.get(key).cloned()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {e}")))
    }
}

#[async_trait]
impl HashStore for MemoryStore {
    async fn write_hash(&self, key: &str, fields: &Fields) -> Result<(), StoreError> {
        let mut batch = Batch::new();
        batch.replace_hash(key, fields.clone());
        self.lock()?.apply(&batch);
        Ok(())
    }

    async fn read_hash(&self, key: &str) -> Result<Fields, StoreError> {
        Ok(self.lock()?.hashes.get(key).cloned().unwrap_or_default())
    }

    async fn delete_hash(&self, key: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let existed = inner.hashes.remove(key).is_some();
        if existed {
            inner.touch(key);
        }
        Ok(existed)
    }

    async fn add_member(&self, set: &str, member: &str) -> Result<(), StoreError> {
        let mut batch = Batch::new();
        batch.add_member(set, member);
        self.lock()?.apply(&batch);
        Ok(())
    }

    async fn remove_member(&self, set: &str, member: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let removed = inner
            .sets
            .get_mut(set)
            .is_some_and(|members| members.remove(member));
        if removed {
            inner.touch(set);
        }
        Ok(removed)
    }

    async fn members(&self, set: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .lock()?
            .sets
            .get(set)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn exec(&self, batch: Batch) -> Result<(), StoreError> {
        self.lock()?.apply(&batch);
        Ok(())
    }

    async fn with_watch(
        &self,
        key: &str,
        precondition: Precondition,
        batch: Batch,
    ) -> Result<TxOutcome, StoreError> {
        let watched = {
            let inner = self.lock()?;
            if !precondition.holds(inner.hashes.contains_key(key)) {
                return Ok(TxOutcome::PreconditionFailed);
            }
            inner.version(key)
        };

        // Let other tasks run between watch and commit, as a network round-trip would.
        tokio::task::yield_now().await;

        let mut inner = self.lock()?;
        if inner.interfere.remove(key) {
            inner.touch(key);
        }
        if inner.version(key) != watched {
            debug!(key, "watched key changed, aborting transaction");
            return Ok(TxOutcome::Aborted);
        }

        inner.apply(&batch);
        Ok(TxOutcome::Committed)
    }
}
