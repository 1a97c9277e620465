//! Invocation dispatch: function name + positional string arguments → ledger operation.
//!
//! ```text
//! (function, args)
//!   ↓
//! 1. Route by function name (unknown names are rejected)
//!   ↓
//! 2. Check argument count
//!   ↓
//! 3. Sanitize arguments (non-empty, bounded length)
//!   ↓
//! 4. Parse typed ids / enums and run the ledger operation
//!   ↓
//! 5. Encode the response payload (empty for writes)
//! ```
//!
//! The dispatcher holds no state of its own; everything goes through
//! [`FoodSupplyLedger`].

use serde::Serialize;
use tracing::{info, warn};

use foodtrace_core::{ListingId, ParticipantId, ProductId, RegulatorId, sanitize_arguments};
use foodtrace_parties::ParticipantRole;
use foodtrace_regulation::ExemptionListKind;

use crate::config::LedgerConfig;
use crate::entity_store::EntityStore;
use crate::error::LedgerError;
use crate::ledger::FoodSupplyLedger;

/// Accepted argument counts for one function.
#[derive(Debug, Clone, Copy)]
enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    fn check(self, args: &[String], message: &str) -> Result<(), LedgerError> {
        let ok = match self {
            Arity::Exactly(n) => args.len() == n,
            Arity::AtLeast(n) => args.len() >= n,
            Arity::Between(min, max) => (min..=max).contains(&args.len()),
        };
        if ok {
            Ok(())
        } else {
            Err(LedgerError::validation(format!(
                "Incorrect number of arguments. {message}"
            )))
        }
    }
}

#[derive(Debug)]
pub struct CommandDispatcher<S> {
    ledger: FoodSupplyLedger<S>,
}

impl<S> CommandDispatcher<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            ledger: FoodSupplyLedger::new(store, config),
        }
    }

    pub fn ledger(&self) -> &FoodSupplyLedger<S> {
        &self.ledger
    }
}

impl<S> CommandDispatcher<S>
where
    S: EntityStore,
{
    /// Run `function` with `args` and return its payload.
    ///
    /// Write operations return an empty payload; reads return the stored bytes
    /// or a JSON document.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        info!(function, args = args.len(), "invoking function");

        let result = self.route(function, args);
        if let Err(err) = &result {
            warn!(function, error = %err, "invocation rejected");
        }
        result
    }

    /// Legacy query entry point; always fails.
    pub fn query(&self) -> Result<Vec<u8>, LedgerError> {
        Err(LedgerError::QueryUnsupported)
    }

    fn route(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        match function {
            // Init takes an optional numeric self-test value; an empty one is allowed.
            "init" => {
                let selftest = match args {
                    [value] => Some(value.as_str()),
                    _ => None,
                };
                self.ledger.init(selftest)?;
                Ok(Vec::new())
            }
            "read" => {
                self.prepare(args, Arity::Exactly(1), "Expecting key of the var to query")?;
                self.ledger.read(&args[0])
            }
            "write" => {
                self.prepare(
                    args,
                    Arity::Exactly(2),
                    "Expecting 2. key of the variable and value to set",
                )?;
                self.ledger.write(&args[0], &args[1])?;
                Ok(Vec::new())
            }
            "delete" => {
                self.prepare(args, Arity::Exactly(1), "Expecting 1")?;
                self.ledger.delete(&args[0])?;
                Ok(Vec::new())
            }
            "init_product" => {
                self.prepare(args, Arity::Exactly(3), "Expecting id, quantity and countryId")?;
                self.ledger
                    .init_product(ProductId::new(&args[0]), &args[1], &args[2])?;
                Ok(Vec::new())
            }
            "init_user" => {
                self.prepare(args, Arity::AtLeast(2), "Expecting at least id and type")?;
                let role: ParticipantRole = args[1].parse()?;
                self.ledger
                    .init_user(ParticipantId::new(&args[0]), role, &args[2..])?;
                Ok(Vec::new())
            }
            "init_regulator" => {
                self.prepare(args, Arity::Exactly(2), "Expecting id and countryId")?;
                self.ledger
                    .init_regulator(RegulatorId::new(&args[0]), &args[1])?;
                Ok(Vec::new())
            }
            "init_product_listing" => {
                self.prepare(
                    args,
                    Arity::AtLeast(2),
                    "Expecting listing id, supplier id and product ids",
                )?;
                let products = args[2..].iter().map(ProductId::new).collect();
                self.ledger.init_product_listing(
                    ListingId::new(&args[0]),
                    ParticipantId::new(&args[1]),
                    products,
                )?;
                Ok(Vec::new())
            }
            "transfer_product_listing" => {
                self.prepare(args, Arity::Exactly(2), "Expecting listing id and new owner id")?;
                self.ledger.transfer_product_listing(
                    ListingId::new(&args[0]),
                    ParticipantId::new(&args[1]),
                )?;
                Ok(Vec::new())
            }
            "check_products" => {
                self.prepare(args, Arity::Exactly(2), "Expecting listing id and regulator id")?;
                self.ledger
                    .check_products(ListingId::new(&args[0]), RegulatorId::new(&args[1]))?;
                Ok(Vec::new())
            }
            "update_exempted_list" => {
                self.prepare(
                    args,
                    Arity::AtLeast(2),
                    "Expecting regulator id, list type and ids",
                )?;
                let kind: ExemptionListKind = args[1].parse()?;
                self.ledger.update_exempted_list(
                    RegulatorId::new(&args[0]),
                    kind,
                    args[2..].to_vec(),
                )?;
                Ok(Vec::new())
            }
            "read_everything" => encode(&self.ledger.read_everything()?),
            // Either a key / entity id, or an explicit namespace and id.
            "getHistory" => {
                self.prepare(args, Arity::Between(1, 2), "Expecting id, or kind and id")?;
                let entries = match args {
                    [kind, id] => self.ledger.history_of(kind.parse()?, id)?,
                    _ => self.ledger.history(&args[0])?,
                };
                encode(&entries)
            }
            other => Err(LedgerError::UnknownFunction(other.to_string())),
        }
    }

    fn prepare(&self, args: &[String], arity: Arity, message: &str) -> Result<(), LedgerError> {
        arity.check(args, message)?;
        sanitize_arguments(args, self.ledger.config().max_argument_len)?;
        Ok(())
    }
}

fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(payload)
        .map_err(|e| LedgerError::Serialization(format!("failed to encode response: {e}")))
}
