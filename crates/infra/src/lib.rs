//! Infrastructure layer: entity store, repository, ledger service, invocation dispatch.

pub mod command_dispatcher;
pub mod config;
pub mod entity_store;
pub mod error;
pub mod ledger;
pub mod repository;


pub use command_dispatcher::CommandDispatcher;
pub use config::{ConfigError, LedgerConfig};
pub use entity_store::{EntityStore, InMemoryEntityStore, StoreError};
pub use error::LedgerError;
pub use ledger::{AuditEntry, Everything, FoodSupplyLedger};
