//! Identifiers and the namespaced storage key encoding.
//!
//! Every record lives in one flat keyspace. Keys are built from an explicit
//! `(EntityKind, id)` pair instead of relying on id strings that happen to start
//! with `product`, `retailer`, ... Range-scan bounds come from the same encoding.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a supplier, importer or retailer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

/// Identifier of a regulator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegulatorId(String);

/// Identifier of a product listing contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

macro_rules! impl_string_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

impl_string_newtype!(ProductId);
impl_string_newtype!(ParticipantId);
impl_string_newtype!(RegulatorId);
impl_string_newtype!(ListingId);

/// Record namespaces of the shared keyspace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Product,
    Supplier,
    Importer,
    Retailer,
    Regulator,
    Listing,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Product,
        EntityKind::Supplier,
        EntityKind::Importer,
        EntityKind::Retailer,
        EntityKind::Regulator,
        EntityKind::Listing,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Supplier => "supplier",
            EntityKind::Importer => "importer",
            EntityKind::Retailer => "retailer",
            EntityKind::Regulator => "regulator",
            EntityKind::Listing => "productlistingcontract",
        }
    }

    /// Half-open key range `[start, end)` covering every record of this kind.
    pub fn range(self) -> (StorageKey, StorageKey) {
        let prefix = self.prefix();
        (
            StorageKey(format!("{prefix}{}", StorageKey::SEPARATOR)),
            StorageKey(format!("{prefix}{}", StorageKey::RANGE_END)),
        )
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.prefix() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown entity kind - {s}")))
    }
}

/// Key of a record in the entity store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    const SEPARATOR: char = ':';
    // First character after SEPARATOR; bounds the namespace range.
    const RANGE_END: char = ';';

    pub fn new(kind: EntityKind, id: &str) -> Self {
        Self(format!("{}{}{id}", kind.prefix(), Self::SEPARATOR))
    }

    /// Key taken verbatim from a caller (generic read/write passthrough).
    pub fn raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a namespaced key back into kind and id.
    ///
    /// Returns `None` for raw keys outside every namespace.
    pub fn parse(&self) -> Option<(EntityKind, &str)> {
        let (prefix, id) = self.0.split_once(Self::SEPARATOR)?;
        let kind = EntityKind::from_str(prefix).ok()?;
        Some((kind, id))
    }
}

impl core::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn key_round_trips_through_parse() {
        let key = StorageKey::new(EntityKind::Listing, "L1");
        assert_eq!(key.as_str(), "productlistingcontract:L1");
        assert_eq!(key.parse(), Some((EntityKind::Listing, "L1")));
    }

    #[test]
    fn raw_keys_outside_namespaces_do_not_parse() {
        assert_eq!(StorageKey::raw("selftest").parse(), None);
        assert_eq!(StorageKey::raw("unknown:x").parse(), None);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ProductId::new("P1")).unwrap();
        assert_eq!(json, "\"P1\"");
    }

    proptest! {
        /// Property: every key of a kind falls inside that kind's range and no other.
        #[test]
        fn keys_fall_inside_their_own_range_only(id in "[ -~]{1,32}") {
            for kind in EntityKind::ALL {
                let key = StorageKey::new(kind, &id);
                for other in EntityKind::ALL {
                    let (start, end) = other.range();
                    let inside = key >= start && key < end;
                    prop_assert_eq!(inside, kind == other);
                }
            }
        }
    }
}
