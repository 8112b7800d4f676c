//! The key/value seam the repository is written against.
//!
//! Two implementations: [`RedisService`](crate::infrastructure::redis::client::RedisService)
//! for deployments and [`MemoryStore`](memory::MemoryStore) for tests and local runs.

pub mod memory;

use async_trait::async_trait;

use crate::marshal::Fields;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A write queued for [`HashStore::exec`] or [`HashStore::with_watch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Drops the hash and writes `fields` in its place.
    ReplaceHash { key: String, fields: Fields },
    AddMember { set: String, member: String },
    RemoveMember { set: String, member: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    ops: Vec<Op>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_hash(&mut self, key: impl Into<String>, fields: Fields) -> &mut Self {
        self.ops.push(Op::ReplaceHash {
            key: key.into(),
            fields,
        });
        self
    }

    pub fn add_member(&mut self, set: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.ops.push(Op::AddMember {
            set: set.into(),
            member: member.into(),
        });
        self
    }

    pub fn remove_member(
        &mut self,
        set: impl Into<String>,
        member: impl Into<String>,
    ) -> &mut Self {
        self.ops.push(Op::RemoveMember {
            set: set.into(),
            member: member.into(),
        });
        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Existence check evaluated after the watch is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Any,
    Exists,
    Absent,
}

impl Precondition {
    pub fn holds(self, exists: bool) -> bool {
        match self {
            Precondition::Any => true,
            Precondition::Exists => exists,
            Precondition::Absent => !exists,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    Committed,
    /// The watched key changed before commit; nothing was written.
    Aborted,
    /// The precondition did not hold; nothing was written.
    PreconditionFailed,
}

#[async_trait]
pub trait HashStore: Send + Sync {
    /// Replaces every field of the hash at `key`.
    async fn write_hash(&self, key: &str, fields: &Fields) -> Result<(), StoreError>;

    /// All fields of the hash at `key`; empty when the key does not exist.
    async fn read_hash(&self, key: &str) -> Result<Fields, StoreError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_hash(&self, key: &str) -> Result<bool, StoreError>;

    async fn add_member(&self, set: &str, member: &str) -> Result<(), StoreError>;

    async fn remove_member(&self, set: &str, member: &str) -> Result<bool, StoreError>;

    async fn members(&self, set: &str) -> Result<Vec<String>, StoreError>;

    /// Applies the batch atomically, without watching anything.
    async fn exec(&self, batch: Batch) -> Result<(), StoreError>;

    /// Optimistic transaction: watch `key`, check `precondition`, then apply
    /// the batch atomically unless `key` changed in the meantime.
    ///
    /// Every call runs on its own transaction handle.
    async fn with_watch(
        &self,
        key: &str,
        precondition: Precondition,
        batch: Batch,
    ) -> Result<TxOutcome, StoreError>;
}
