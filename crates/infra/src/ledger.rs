//! Ledger operations: entity registration, custody transfer, regulatory checks.
//!
//! Each operation is one logical transaction:
//!
//! ```text
//! load records (remember revisions)
//!   ↓
//! decide (pure aggregate / record logic)
//!   ↓
//! stage whole-record overwrites into one WriteBatch
//!   ↓
//! commit atomically (stale revisions reject the whole batch)
//! ```
//!
//! Arguments arrive already sanitized (see `command_dispatcher`).

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use foodtrace_core::{
    Aggregate, AggregateRoot, DomainError, Entity, EntityKind, ExpectedVersion, ListingId,
    ParticipantId, ProductId, RegulatorId, StorageKey,
};
use foodtrace_events::Event;
use foodtrace_listings::{
    CheckProducts, CreateListing, ListingCommand, ListingEvent, OwnerType, ProductListingContract,
    RetailDelivery, TransferListing,
};
use foodtrace_parties::{Participant, ParticipantRole, Retailer, Supplier};
use foodtrace_products::Product;
use foodtrace_regulation::{ExemptionListKind, Regulator};

use crate::config::LedgerConfig;
use crate::entity_store::{CommitReceipt, EntityStore, Revision, WriteBatch};
use crate::error::LedgerError;
use crate::repository::{LedgerRepository, Loaded, stage};

/// Key the numeric init argument is written under.
pub const SELFTEST_KEY: &str = "selftest";
/// Key the chaincode version is written under.
pub const VERSION_KEY: &str = "food_reg_ui";

/// Every record in the ledger, grouped by namespace.
///
/// Participants stay wrapped in [`Participant`] so each entry carries its
/// `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Everything {
    pub products: Vec<Product>,
    pub retailers: Vec<Participant>,
    pub importers: Vec<Participant>,
    pub suppliers: Vec<Participant>,
    pub regulators: Vec<Regulator>,
    #[serde(rename = "listingcontracts")]
    pub listings: Vec<ProductListingContract>,
}

/// One revision of a key, as returned by `history`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    #[serde(rename = "txId")]
    pub tx_id: String,
    #[serde(rename = "committedAt")]
    pub committed_at: DateTime<Utc>,
    /// `None` when the revision deleted the key.
    pub value: Option<JsonValue>,
}

#[derive(Debug)]
pub struct FoodSupplyLedger<S> {
    repo: LedgerRepository<S>,
    config: LedgerConfig,
}

impl<S> FoodSupplyLedger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            repo: LedgerRepository::new(store),
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn repository(&self) -> &LedgerRepository<S> {
        &self.repo
    }
}

impl<S> FoodSupplyLedger<S>
where
    S: EntityStore,
{
    // ---------------------------------------------------------------------
    // Init and raw passthrough
    // ---------------------------------------------------------------------

    /// Initialize (or reset) ledger metadata.
    ///
    /// A numeric `selftest` value is stored under [`SELFTEST_KEY`]; the
    /// configured version is always stored under [`VERSION_KEY`].
    pub fn init(&self, selftest: Option<&str>) -> Result<(), LedgerError> {
        let mut batch = WriteBatch::new();
        if let Some(raw) = selftest.filter(|s| !s.is_empty()) {
            let number: i64 = raw.parse().map_err(|_| {
                LedgerError::validation(
                    "Expecting a numeric string argument to Init() for instantiate",
                )
            })?;
            batch.put(
                StorageKey::raw(SELFTEST_KEY),
                number.to_string().into_bytes(),
                ExpectedVersion::Any,
            );
        }
        batch.put(
            StorageKey::raw(VERSION_KEY),
            self.config.chaincode_version.clone().into_bytes(),
            ExpectedVersion::Any,
        );

        self.repo.store().commit(batch)?;
        info!(version = %self.config.chaincode_version, "ledger initialized");
        Ok(())
    }

    /// Current value of a raw key or of the record with id `key`.
    ///
    /// A raw key wins; an id must exist in exactly one namespace.
    pub fn read(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        let found = self.resolve(key, |candidate| {
            Ok(self.repo.store().get(candidate)?.map(|current| current.value))
        })?;
        found
            .map(|(_, value)| value)
            .ok_or_else(|| LedgerError::not_found(format!("Failed to get state for {key}")))
    }

    pub fn write(&self, key: &str, value: &str) -> Result<(), LedgerError> {
        self.repo
            .store()
            .put(StorageKey::raw(key), value.as_bytes().to_vec())?;
        debug!(key, "raw value written");
        Ok(())
    }

    /// Remove a key; its history keeps a tombstone revision.
    pub fn delete(&self, key: &str) -> Result<(), LedgerError> {
        self.repo.store().delete(StorageKey::raw(key))?;
        debug!(key, "key deleted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Entity registration
    // ---------------------------------------------------------------------

    pub fn init_product(
        &self,
        id: ProductId,
        quantity: &str,
        country_id: &str,
    ) -> Result<(), LedgerError> {
        let product = Product::new(id, quantity, country_id);
        self.create_record(&product, "This product already exists")?;
        info!(product_id = %product.id(), "product registered");
        Ok(())
    }

    /// Register a supplier, importer or retailer.
    ///
    /// `details` holds the role-specific positional fields (see
    /// [`Participant::register`]).
    pub fn init_user(
        &self,
        id: ParticipantId,
        role: ParticipantRole,
        details: &[String],
    ) -> Result<(), LedgerError> {
        let participant = Participant::register(role, id, details)?;
        self.create_record(&participant, "This user already exists")?;
        info!(participant_id = %participant.id(), %role, "participant registered");
        Ok(())
    }

    pub fn init_regulator(&self, id: RegulatorId, country_id: &str) -> Result<(), LedgerError> {
        let regulator = Regulator::new(id, country_id);
        self.create_record(&regulator, "This regulator already exists")?;
        info!(regulator_id = %regulator.id(), "regulator registered");
        Ok(())
    }

    pub fn get_product(&self, id: &ProductId) -> Result<Product, LedgerError> {
        Ok(self
            .repo
            .require::<Product>(EntityKind::Product, id.as_str(), "Product")?
            .record)
    }

    pub fn get_participant(
        &self,
        role: ParticipantRole,
        id: &ParticipantId,
    ) -> Result<Participant, LedgerError> {
        Ok(self.load_participant(role, id)?.record)
    }

    pub fn get_regulator(&self, id: &RegulatorId) -> Result<Regulator, LedgerError> {
        Ok(self.load_regulator(id)?.record)
    }

    pub fn get_listing(&self, id: &ListingId) -> Result<ProductListingContract, LedgerError> {
        self.load_listing(id)
    }

    // ---------------------------------------------------------------------
    // Listing lifecycle
    // ---------------------------------------------------------------------

    /// Create a listing owned by `supplier_id` in `INITIALREQUEST`.
    pub fn init_product_listing(
        &self,
        listing_id: ListingId,
        supplier_id: ParticipantId,
        products: Vec<ProductId>,
    ) -> Result<(), LedgerError> {
        info!(listing_id = %listing_id, supplier_id = %supplier_id, "starting init_product_listing");

        // The owner must resolve to a supplier record.
        self.load_supplier(&supplier_id)?;

        let key = StorageKey::new(EntityKind::Listing, listing_id.as_str());
        let listing = match self.repo.load::<ProductListingContract>(&key)? {
            Some(existing) => existing.record.with_version(existing.version),
            None => ProductListingContract::empty(listing_id.clone()),
        };

        let command = ListingCommand::CreateListing(CreateListing {
            listing_id,
            supplier_id,
            products,
            occurred_at: Utc::now(),
        });
        self.execute(listing, command, ExpectedVersion::Absent, WriteBatch::new())?;
        Ok(())
    }

    /// Move the listing one custody hop to `new_owner`.
    ///
    /// Supplier → Importer starts the exemption check. Importer → Retailer also
    /// appends the listing's products to the retailer's holdings; the retailer
    /// and the listing are written in the same batch.
    pub fn transfer_product_listing(
        &self,
        listing_id: ListingId,
        new_owner: ParticipantId,
    ) -> Result<(), LedgerError> {
        info!(listing_id = %listing_id, new_owner = %new_owner, "starting transfer_product_listing");

        let listing = self.load_listing(&listing_id)?;
        let expected = ExpectedVersion::Exact(listing.version());
        let from = listing.owner_type();

        let command = ListingCommand::TransferListing(TransferListing {
            listing_id,
            new_owner: new_owner.clone(),
            occurred_at: Utc::now(),
        });

        // Decide first: state and role errors win over lookups of the new owner.
        let events = listing.handle(&command)?;

        let mut batch = WriteBatch::new();
        if from.next_hop() == Some(OwnerType::Importer) {
            self.load_participant(ParticipantRole::Importer, &new_owner)?;
        }
        for delivery in events.iter().filter_map(RetailDelivery::from_event) {
            let loaded = self.load_retailer(&delivery.retailer_id)?;
            let mut retailer = loaded.record.clone();
            delivery.deliver_to(&mut retailer)?;
            debug!(
                retailer_id = %delivery.retailer_id,
                delivered = delivery.products.len(),
                holdings = retailer.products().len(),
                "retailer holdings updated"
            );
            let participant = Participant::Retailer(retailer);
            stage(
                &mut batch,
                participant.storage_key(),
                &participant,
                loaded.expected(),
            )?;
        }

        self.commit_events(listing, events, expected, batch)?;
        Ok(())
    }

    /// Run a regulator check on a listing awaiting inspection.
    pub fn check_products(
        &self,
        listing_id: ListingId,
        regulator_id: RegulatorId,
    ) -> Result<(), LedgerError> {
        info!(listing_id = %listing_id, regulator_id = %regulator_id, "starting check_products");

        let listing = self.load_listing(&listing_id)?;
        let supplier = self.load_supplier(listing.supplier())?;
        let regulator = self.load_regulator(&regulator_id)?.record;
        let expected = ExpectedVersion::Exact(listing.version());

        let command = ListingCommand::CheckProducts(CheckProducts {
            listing_id,
            supplier,
            regulator,
            occurred_at: Utc::now(),
        });
        self.execute(listing, command, expected, WriteBatch::new())?;
        Ok(())
    }

    /// Replace (never merge) one of the regulator's exemption lists.
    pub fn update_exempted_list(
        &self,
        regulator_id: RegulatorId,
        kind: ExemptionListKind,
        ids: Vec<String>,
    ) -> Result<(), LedgerError> {
        info!(regulator_id = %regulator_id, ?kind, count = ids.len(), "starting update_exempted_list");

        let loaded = self.load_regulator(&regulator_id)?;
        let mut regulator = loaded.record.clone();
        regulator.replace_exempted(kind, ids);

        let mut batch = WriteBatch::new();
        stage(&mut batch, regulator.storage_key(), &regulator, loaded.expected())?;
        self.repo.store().commit(batch)?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Aggregated reads
    // ---------------------------------------------------------------------

    pub fn read_everything(&self) -> Result<Everything, LedgerError> {
        // A namespace only ever holds its own role.
        let participants = |role: ParticipantRole| -> Result<Vec<Participant>, LedgerError> {
            Ok(self
                .repo
                .scan::<Participant>(role.entity_kind())?
                .into_iter()
                .filter(|p| p.role() == role)
                .collect())
        };

        Ok(Everything {
            products: self.repo.scan(EntityKind::Product)?,
            retailers: participants(ParticipantRole::Retailer)?,
            importers: participants(ParticipantRole::Importer)?,
            suppliers: participants(ParticipantRole::Supplier)?,
            regulators: self.repo.scan(EntityKind::Regulator)?,
            listings: self.repo.scan(EntityKind::Listing)?,
        })
    }

    /// Revision history of a raw key or of the record with id `key`, oldest first.
    pub fn history(&self, key: &str) -> Result<Vec<AuditEntry>, LedgerError> {
        let found = self.resolve(key, |candidate| {
            let revisions = self.repo.store().history(candidate)?;
            Ok((!revisions.is_empty()).then_some(revisions))
        })?;
        let (resolved, revisions) = found
            .ok_or_else(|| LedgerError::not_found(format!("Failed to get history for {key}")))?;
        debug!(key, resolved = %resolved, revisions = revisions.len(), "history resolved");
        Ok(audit_entries(revisions))
    }

    /// Revision history of the `kind` record with id `id`, oldest first.
    pub fn history_of(&self, kind: EntityKind, id: &str) -> Result<Vec<AuditEntry>, LedgerError> {
        let key = StorageKey::new(kind, id);
        let revisions = self.repo.store().history(&key)?;
        if revisions.is_empty() {
            return Err(LedgerError::not_found(format!(
                "Failed to get history for {kind} {id}"
            )));
        }
        Ok(audit_entries(revisions))
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    /// Find the storage key a caller-supplied `key` names.
    ///
    /// A raw key (`selftest`, keys set through `write`) wins. Otherwise `key` is
    /// taken as an entity id and must resolve in exactly one namespace.
    fn resolve<T>(
        &self,
        key: &str,
        lookup: impl Fn(&StorageKey) -> Result<Option<T>, LedgerError>,
    ) -> Result<Option<(StorageKey, T)>, LedgerError> {
        let raw = StorageKey::raw(key);
        if let Some(found) = lookup(&raw)? {
            return Ok(Some((raw, found)));
        }

        let mut matches = Vec::new();
        for kind in EntityKind::ALL {
            let candidate = StorageKey::new(kind, key);
            if let Some(found) = lookup(&candidate)? {
                matches.push((kind, candidate, found));
            }
        }

        if matches.len() > 1 {
            let kinds: Vec<&str> = matches.iter().map(|(kind, _, _)| kind.prefix()).collect();
            return Err(LedgerError::validation(format!(
                "Id {key} is ambiguous, it exists as {}. Pass the kind as well",
                kinds.join(", ")
            )));
        }
        Ok(matches.pop().map(|(_, candidate, found)| (candidate, found)))
    }

    fn create_record<T>(&self, record: &T, exists_msg: &str) -> Result<CommitReceipt, LedgerError>
    where
        T: Entity + Serialize,
    {
        let key = record.storage_key();
        if self.repo.exists(&key)? {
            return Err(DomainError::conflict(format!(
                "{exists_msg} - {}",
                record.id().as_ref()
            ))
            .into());
        }

        let mut batch = WriteBatch::new();
        stage(&mut batch, key, record, ExpectedVersion::Absent)?;
        Ok(self.repo.store().commit(batch)?)
    }

    fn load_listing(&self, id: &ListingId) -> Result<ProductListingContract, LedgerError> {
        let loaded = self.repo.require::<ProductListingContract>(
            EntityKind::Listing,
            id.as_str(),
            "Product listing",
        )?;
        Ok(loaded.record.with_version(loaded.version))
    }

    fn load_participant(
        &self,
        role: ParticipantRole,
        id: &ParticipantId,
    ) -> Result<Loaded<Participant>, LedgerError> {
        let label = match role {
            ParticipantRole::Supplier => "Supplier",
            ParticipantRole::Importer => "Importer",
            ParticipantRole::Retailer => "Retailer",
        };
        let loaded = self
            .repo
            .require::<Participant>(role.entity_kind(), id.as_str(), label)?;

        if loaded.record.role() != role {
            return Err(DomainError::invariant(format!(
                "record {id} in the {role} namespace is a {}",
                loaded.record.role()
            ))
            .into());
        }
        Ok(loaded)
    }

    fn load_supplier(&self, id: &ParticipantId) -> Result<Supplier, LedgerError> {
        self.load_participant(ParticipantRole::Supplier, id)?
            .record
            .into_supplier()
            .ok_or_else(|| DomainError::invariant(format!("{id} is not a supplier")).into())
    }

    fn load_retailer(&self, id: &ParticipantId) -> Result<Loaded<Retailer>, LedgerError> {
        let loaded = self.load_participant(ParticipantRole::Retailer, id)?;
        let version = loaded.version;
        let record = loaded
            .record
            .into_retailer()
            .ok_or_else(|| LedgerError::from(DomainError::invariant(format!("{id} is not a retailer"))))?;
        Ok(Loaded { record, version })
    }

    fn load_regulator(&self, id: &RegulatorId) -> Result<Loaded<Regulator>, LedgerError> {
        self.repo
            .require::<Regulator>(EntityKind::Regulator, id.as_str(), "Regulator")
    }

    /// Decide `command` against `listing`, then commit the result.
    fn execute(
        &self,
        listing: ProductListingContract,
        command: ListingCommand,
        expected: ExpectedVersion,
        batch: WriteBatch,
    ) -> Result<CommitReceipt, LedgerError> {
        let events = listing.handle(&command)?;
        self.commit_events(listing, events, expected, batch)
    }

    /// Apply decided events and write the listing together with `batch`.
    fn commit_events(
        &self,
        mut listing: ProductListingContract,
        events: Vec<ListingEvent>,
        expected: ExpectedVersion,
        mut batch: WriteBatch,
    ) -> Result<CommitReceipt, LedgerError> {
        for event in &events {
            listing.apply(event);
        }
        stage(&mut batch, listing.storage_key(), &listing, expected)?;

        let receipt = self.repo.store().commit(batch)?;
        for event in &events {
            info!(
                listing_id = event.subject(),
                event_type = event.event_type(),
                status = ?listing.status(),
                owner_type = ?listing.owner_type(),
                tx_id = %receipt.tx_id,
                "listing updated"
            );
        }
        Ok(receipt)
    }
}

fn audit_entries(revisions: Vec<Revision>) -> Vec<AuditEntry> {
    revisions
        .into_iter()
        .map(|rev| AuditEntry {
            tx_id: rev.tx_id.to_string(),
            committed_at: rev.committed_at,
            value: rev.value.map(|bytes| {
                serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                    JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
                })
            }),
        })
        .collect()
}
