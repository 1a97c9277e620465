//! Entity trait: identity + continuity across state changes.

use crate::id::{EntityKind, StorageKey};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + AsRef<str>;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Namespace the entity is persisted under.
    fn kind(&self) -> EntityKind;

    /// Storage key derived from `kind()` and `id()`.
    fn storage_key(&self) -> StorageKey {
        StorageKey::new(self.kind(), self.id().as_ref())
    }
}
