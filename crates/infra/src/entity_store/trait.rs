use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use foodtrace_core::{ExpectedVersion, StorageKey};
use std::sync::Arc;

/// Current live value of a key together with its revision number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    /// Number of revisions written to the key so far (deletions included).
    pub version: u64,
    pub value: Vec<u8>,
}

/// One entry in a key's revision history.
///
/// `value` is `None` when the revision deleted the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub tx_id: Uuid,
    pub version: u64,
    pub committed_at: DateTime<Utc>,
    pub value: Option<Vec<u8>>,
}

/// A single staged write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put {
        key: StorageKey,
        value: Vec<u8>,
        expected: ExpectedVersion,
    },
    Delete {
        key: StorageKey,
        expected: ExpectedVersion,
    },
}

impl WriteOp {
    pub fn key(&self) -> &StorageKey {
        match self {
            WriteOp::Put { key, .. } | WriteOp::Delete { key, .. } => key,
        }
    }

    pub fn expected(&self) -> ExpectedVersion {
        match self {
            WriteOp::Put { expected, .. } | WriteOp::Delete { expected, .. } => *expected,
        }
    }
}

/// Writes that commit together or not at all.
///
/// Every op carries the version its record was read at, so a batch built from
/// stale reads is rejected as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: StorageKey, value: Vec<u8>, expected: ExpectedVersion) -> &mut Self {
        self.ops.push(WriteOp::Put {
            key,
            value,
            expected,
        });
        self
    }

    pub fn delete(&mut self, key: StorageKey, expected: ExpectedVersion) -> &mut Self {
        self.ops.push(WriteOp::Delete { key, expected });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub tx_id: Uuid,
    pub committed_at: DateTime<Utc>,
    /// New revision of every key written, in batch order.
    pub versions: Vec<(StorageKey, u64)>,
}

/// Entity store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, state preconditions).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("invalid write batch: {0}")]
    InvalidBatch(String),

    #[error("invalid key range: {0}")]
    InvalidRange(String),

    #[error("entity store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed, versioned record store.
///
/// ## Semantics
///
/// - `get` returns the latest live value of a key, `None` if the key was never
///   written or its latest revision is a deletion
/// - `range_scan` returns live values for keys in `[start, end)`, ordered by key
/// - `history` returns every revision of a key, oldest first
/// - `commit` applies a [`WriteBatch`] atomically under one transaction id,
///   after checking every op's [`ExpectedVersion`]
pub trait EntityStore: Send + Sync {
    fn get(&self, key: &StorageKey) -> Result<Option<VersionedValue>, StoreError>;

    fn range_scan(
        &self,
        start: &StorageKey,
        end: &StorageKey,
    ) -> Result<Vec<(StorageKey, Vec<u8>)>, StoreError>;

    fn history(&self, key: &StorageKey) -> Result<Vec<Revision>, StoreError>;

    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError>;

    /// Unconditional single-key write.
    fn put(&self, key: StorageKey, value: Vec<u8>) -> Result<CommitReceipt, StoreError> {
        let mut batch = WriteBatch::new();
        batch.put(key, value, ExpectedVersion::Any);
        self.commit(batch)
    }

    /// Unconditional single-key deletion (recorded as a tombstone revision).
    fn delete(&self, key: StorageKey) -> Result<CommitReceipt, StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete(key, ExpectedVersion::Any);
        self.commit(batch)
    }
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    fn get(&self, key: &StorageKey) -> Result<Option<VersionedValue>, StoreError> {
        (**self).get(key)
    }

    fn range_scan(
        &self,
        start: &StorageKey,
        end: &StorageKey,
    ) -> Result<Vec<(StorageKey, Vec<u8>)>, StoreError> {
        (**self).range_scan(start, end)
    }

    fn history(&self, key: &StorageKey) -> Result<Vec<Revision>, StoreError> {
        (**self).history(key)
    }

    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        (**self).commit(batch)
    }
}
