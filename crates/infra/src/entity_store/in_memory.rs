use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use foodtrace_core::StorageKey;

use super::r#trait::{
    CommitReceipt, EntityStore, Revision, StoreError, VersionedValue, WriteBatch, WriteOp,
};

/// In-memory versioned entity store.
///
/// Intended for tests/dev. Keeps every revision of every key.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    keys: RwLock<BTreeMap<StorageKey, Vec<Revision>>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_value(revisions: &[Revision]) -> Option<&Vec<u8>> {
        revisions.last().and_then(|r| r.value.as_ref())
    }
}

impl EntityStore for InMemoryEntityStore {
    fn get(&self, key: &StorageKey) -> Result<Option<VersionedValue>, StoreError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(keys.get(key).and_then(|revisions| {
            Self::live_value(revisions).map(|value| VersionedValue {
                version: revisions.len() as u64,
                value: value.clone(),
            })
        }))
    }

    fn range_scan(
        &self,
        start: &StorageKey,
        end: &StorageKey,
    ) -> Result<Vec<(StorageKey, Vec<u8>)>, StoreError> {
        if start > end {
            return Err(StoreError::InvalidRange(format!(
                "range start '{start}' is after range end '{end}'"
            )));
        }

        let keys = self
            .keys
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(keys
            .range(start.clone()..end.clone())
            .filter_map(|(k, revisions)| Self::live_value(revisions).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    fn history(&self, key: &StorageKey) -> Result<Vec<Revision>, StoreError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(keys.get(key).cloned().unwrap_or_default())
    }

    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        let tx_id = Uuid::now_v7();
        let committed_at = Utc::now();

        if batch.is_empty() {
            return Ok(CommitReceipt {
                tx_id,
                committed_at,
                versions: vec![],
            });
        }

        let mut seen = HashSet::new();
        for (idx, op) in batch.ops().iter().enumerate() {
            if !seen.insert(op.key().clone()) {
                return Err(StoreError::InvalidBatch(format!(
                    "batch writes key '{}' more than once (index {idx})",
                    op.key()
                )));
            }
        }

        let mut keys = self
            .keys
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        // Check every op before writing any, so a stale op rejects the whole batch.
        for op in batch.ops() {
            let revisions = keys.get(op.key()).map(Vec::as_slice).unwrap_or(&[]);
            let current = revisions.len() as u64;
            let live = Self::live_value(revisions).is_some();
            if !op.expected().matches(current, live) {
                return Err(StoreError::Concurrency(format!(
                    "key '{}': expected {:?}, found revision {current}",
                    op.key(),
                    op.expected()
                )));
            }
        }

        let mut versions = Vec::with_capacity(batch.len());
        for op in batch.into_ops() {
            let (key, value) = match op {
                WriteOp::Put { key, value, .. } => (key, Some(value)),
                WriteOp::Delete { key, .. } => (key, None),
            };
            let revisions = keys.entry(key.clone()).or_default();
            let version = revisions.len() as u64 + 1;
            revisions.push(Revision {
                tx_id,
                version,
                committed_at,
                value,
            });
            versions.push((key, version));
        }

        Ok(CommitReceipt {
            tx_id,
            committed_at,
            versions,
        })
    }
}
