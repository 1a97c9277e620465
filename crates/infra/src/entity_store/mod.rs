//! Versioned key/value store boundary.
//!
//! This module defines an infrastructure-facing abstraction for the ledger's
//! world state without making any storage assumptions: keyed records, a full
//! revision history per key, and atomic multi-key write batches.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryEntityStore;
pub use r#trait::{
    CommitReceipt, EntityStore, Revision, StoreError, VersionedValue, WriteBatch, WriteOp,
};
