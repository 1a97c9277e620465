//! Typed record access over an [`EntityStore`].
//!
//! Records are JSON documents. The repository decodes them on the way out,
//! remembers the revision they were read at, and stages whole-record
//! overwrites into a [`WriteBatch`] guarded by that revision.

use serde::Serialize;
use serde::de::DeserializeOwned;

use foodtrace_core::{EntityKind, ExpectedVersion, StorageKey};

use crate::entity_store::{EntityStore, WriteBatch};
use crate::error::LedgerError;

/// A decoded record together with the revision it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    pub record: T,
    pub version: u64,
}

impl<T> Loaded<T> {
    /// Expectation to attach when writing this record back.
    pub fn expected(&self) -> ExpectedVersion {
        ExpectedVersion::Exact(self.version)
    }
}

#[derive(Debug)]
pub struct LedgerRepository<S> {
    store: S,
}

impl<S> LedgerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> LedgerRepository<S>
where
    S: EntityStore,
{
    pub fn load<T>(&self, key: &StorageKey) -> Result<Option<Loaded<T>>, LedgerError>
    where
        T: DeserializeOwned,
    {
        let Some(current) = self.store.get(key)? else {
            return Ok(None);
        };
        let record = decode(key, &current.value)?;
        Ok(Some(Loaded {
            record,
            version: current.version,
        }))
    }

    /// Load a record that must exist; `label` names it in the not-found message.
    pub fn require<T>(&self, kind: EntityKind, id: &str, label: &str) -> Result<Loaded<T>, LedgerError>
    where
        T: DeserializeOwned,
    {
        self.load(&StorageKey::new(kind, id))?
            .ok_or_else(|| LedgerError::not_found(format!("{label} does not exist - {id}")))
    }

    pub fn exists(&self, key: &StorageKey) -> Result<bool, LedgerError> {
        Ok(self.store.get(key)?.is_some())
    }

    /// Decode every live record of `kind`, ordered by id.
    pub fn scan<T>(&self, kind: EntityKind) -> Result<Vec<T>, LedgerError>
    where
        T: DeserializeOwned,
    {
        let (start, end) = kind.range();
        self.store
            .range_scan(&start, &end)?
            .into_iter()
            .map(|(key, value)| decode(&key, &value))
            .collect()
    }
}

/// Stage a whole-record overwrite of `record` under `key`.
pub fn stage<T>(
    batch: &mut WriteBatch,
    key: StorageKey,
    record: &T,
    expected: ExpectedVersion,
) -> Result<(), LedgerError>
where
    T: Serialize,
{
    let value = serde_json::to_vec(record)
        .map_err(|e| LedgerError::Serialization(format!("failed to encode {key}: {e}")))?;
    batch.put(key, value, expected);
    Ok(())
}

fn decode<T>(key: &StorageKey, bytes: &[u8]) -> Result<T, LedgerError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::Serialization(format!("failed to decode {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_store::InMemoryEntityStore;
    use foodtrace_core::{ProductId, RegulatorId};
    use foodtrace_products::Product;
    use foodtrace_regulation::Regulator;

    #[test]
    fn require_reports_missing_record_by_label() {
        let repo = LedgerRepository::new(InMemoryEntityStore::new());
        let err = repo
            .require::<Regulator>(EntityKind::Regulator, "R9", "Regulator")
            .unwrap_err();
        assert_eq!(err.to_string(), "Regulator does not exist - R9");
    }

    #[test]
    fn staged_record_loads_back_with_its_revision() {
        let repo = LedgerRepository::new(InMemoryEntityStore::new());
        let regulator = Regulator::new(RegulatorId::new("R1"), "NZ");

        let mut batch = WriteBatch::new();
        stage(
            &mut batch,
            StorageKey::new(EntityKind::Regulator, "R1"),
            &regulator,
            ExpectedVersion::Absent,
        )
        .unwrap();
        repo.store().commit(batch).unwrap();

        let loaded = repo
            .require::<Regulator>(EntityKind::Regulator, "R1", "Regulator")
            .unwrap();
        assert_eq!(loaded.record, regulator);
        assert_eq!(loaded.expected(), ExpectedVersion::Exact(1));
    }

    #[test]
    fn record_of_another_shape_is_a_serialization_error() {
        let repo = LedgerRepository::new(InMemoryEntityStore::new());
        repo.store()
            .put(StorageKey::new(EntityKind::Product, "P1"), b"not json".to_vec())
            .unwrap();
        let err = repo
            .require::<Product>(EntityKind::Product, "P1", "Product")
            .unwrap_err();
        assert!(matches!(err, LedgerError::Serialization(_)));
    }

    #[test]
    fn scan_decodes_only_its_namespace() {
        let repo = LedgerRepository::new(InMemoryEntityStore::new());
        for id in ["P2", "P1"] {
            let product = Product::new(ProductId::new(id), "1", "NZ");
            repo.store()
                .put(
                    StorageKey::new(EntityKind::Product, id),
                    serde_json::to_vec(&product).unwrap(),
                )
                .unwrap();
        }
        repo.store()
            .put(StorageKey::raw("food_reg_ui"), b"4.0.1".to_vec())
            .unwrap();

        let products: Vec<Product> = repo.scan(EntityKind::Product).unwrap();
        assert_eq!(products.len(), 2);
    }
}
