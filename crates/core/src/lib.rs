//! `foodtrace-core`: shared building blocks for the chain-of-custody domain.
//!
//! This crate contains **pure domain** primitives (no storage, no IO): identifiers,
//! the namespaced key encoding, the domain error model and argument sanitizing.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod validation;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{EntityKind, ListingId, ParticipantId, ProductId, RegulatorId, StorageKey};
pub use validation::{DEFAULT_MAX_ARGUMENT_LEN, sanitize_arguments};
