use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodtrace_core::{
    Aggregate, AggregateRoot, DomainError, Entity, EntityKind, ListingId, ParticipantId,
    ProductId, RegulatorId,
};
use foodtrace_events::Event;
use foodtrace_parties::Supplier;
use foodtrace_regulation::Regulator;

use crate::exemption::{self, InspectionOutcome};

/// Listing status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListingStatus {
    InitialRequest,
    ExemptCheckReq,
    HazardAnalysisCheckReq,
    CheckCompleted,
}

impl ListingStatus {
    /// Whether a regulator check may run in this status.
    pub fn awaits_inspection(self) -> bool {
        matches!(
            self,
            ListingStatus::ExemptCheckReq | ListingStatus::HazardAnalysisCheckReq
        )
    }
}

/// Kind of entity currently holding the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerType {
    #[serde(alias = "supplier")]
    Supplier,
    #[serde(alias = "importer")]
    Importer,
    #[serde(alias = "retailer")]
    Retailer,
}

impl OwnerType {
    /// Owner type after the next custody hop, if one is defined.
    pub fn next_hop(self) -> Option<OwnerType> {
        match self {
            OwnerType::Supplier => Some(OwnerType::Importer),
            OwnerType::Importer => Some(OwnerType::Retailer),
            OwnerType::Retailer => None,
        }
    }
}

fn persisted() -> bool {
    true
}

/// Aggregate root: ProductListingContract.
///
/// Persisted as a whole document; `version` and `created` are in-memory only.
/// A listing read back from the store is created by definition, its version is
/// attached by the repository through [`ProductListingContract::with_version`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListingContract {
    id: ListingId,
    status: ListingStatus,
    products: Vec<ProductId>,
    owner: ParticipantId,
    #[serde(rename = "ownertype")]
    owner_type: OwnerType,
    supplier: ParticipantId,
    #[serde(skip)]
    version: u64,
    #[serde(skip, default = "persisted")]
    created: bool,
}

impl ProductListingContract {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: ListingId) -> Self {
        Self {
            id,
            status: ListingStatus::InitialRequest,
            products: Vec::new(),
            owner: ParticipantId::new(String::new()),
            owner_type: OwnerType::Supplier,
            supplier: ParticipantId::new(String::new()),
            version: 0,
            created: false,
        }
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn status(&self) -> ListingStatus {
        self.status
    }

    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    pub fn owner(&self) -> &ParticipantId {
        &self.owner
    }

    pub fn owner_type(&self) -> OwnerType {
        self.owner_type
    }

    pub fn supplier(&self) -> &ParticipantId {
        &self.supplier
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for ProductListingContract {
    type Id = ListingId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Entity for ProductListingContract {
    type Id = ListingId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Listing
    }
}

/// Command: CreateListing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateListing {
    pub listing_id: ListingId,
    pub supplier_id: ParticipantId,
    pub products: Vec<ProductId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: TransferListing (one custody hop to `new_owner`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferListing {
    pub listing_id: ListingId,
    pub new_owner: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CheckProducts.
///
/// Carries the listing's supplier and the checking regulator as loaded by the
/// caller; the aggregate only decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckProducts {
    pub listing_id: ListingId,
    pub supplier: Supplier,
    pub regulator: Regulator,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingCommand {
    CreateListing(CreateListing),
    TransferListing(TransferListing),
    CheckProducts(CheckProducts),
}

/// Event: ListingCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCreated {
    pub listing_id: ListingId,
    pub supplier_id: ParticipantId,
    pub products: Vec<ProductId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransferredToImporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferredToImporter {
    pub listing_id: ListingId,
    pub importer_id: ParticipantId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransferredToRetailer.
///
/// Carries the listing's product ids so the retailer's holdings can be updated
/// in the same commit as the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferredToRetailer {
    pub listing_id: ListingId,
    pub retailer_id: ParticipantId,
    pub products: Vec<ProductId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InspectionCompleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionCompleted {
    pub listing_id: ListingId,
    pub regulator_id: RegulatorId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: HazardAnalysisRequired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardAnalysisRequired {
    pub listing_id: ListingId,
    pub regulator_id: RegulatorId,
    pub org_id: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingEvent {
    ListingCreated(ListingCreated),
    TransferredToImporter(TransferredToImporter),
    TransferredToRetailer(TransferredToRetailer),
    InspectionCompleted(InspectionCompleted),
    HazardAnalysisRequired(HazardAnalysisRequired),
}

impl Event for ListingEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ListingEvent::ListingCreated(_) => "listing.created",
            ListingEvent::TransferredToImporter(_) => "listing.transferred_to_importer",
            ListingEvent::TransferredToRetailer(_) => "listing.transferred_to_retailer",
            ListingEvent::InspectionCompleted(_) => "listing.inspection_completed",
            ListingEvent::HazardAnalysisRequired(_) => "listing.hazard_analysis_required",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn subject(&self) -> &str {
        match self {
            ListingEvent::ListingCreated(e) => e.listing_id.as_str(),
            ListingEvent::TransferredToImporter(e) => e.listing_id.as_str(),
            ListingEvent::TransferredToRetailer(e) => e.listing_id.as_str(),
            ListingEvent::InspectionCompleted(e) => e.listing_id.as_str(),
            ListingEvent::HazardAnalysisRequired(e) => e.listing_id.as_str(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ListingEvent::ListingCreated(e) => e.occurred_at,
            ListingEvent::TransferredToImporter(e) => e.occurred_at,
            ListingEvent::TransferredToRetailer(e) => e.occurred_at,
            ListingEvent::InspectionCompleted(e) => e.occurred_at,
            ListingEvent::HazardAnalysisRequired(e) => e.occurred_at,
        }
    }
}

impl Aggregate for ProductListingContract {
    type Command = ListingCommand;
    type Event = ListingEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ListingEvent::ListingCreated(e) => {
                self.id = e.listing_id.clone();
                self.status = ListingStatus::InitialRequest;
                self.products = e.products.clone();
                self.owner = e.supplier_id.clone();
                self.owner_type = OwnerType::Supplier;
                self.supplier = e.supplier_id.clone();
                self.created = true;
            }
            ListingEvent::TransferredToImporter(e) => {
                self.owner = e.importer_id.clone();
                self.owner_type = OwnerType::Importer;
                self.status = ListingStatus::ExemptCheckReq;
            }
            ListingEvent::TransferredToRetailer(e) => {
                self.owner = e.retailer_id.clone();
                self.owner_type = OwnerType::Retailer;
            }
            ListingEvent::InspectionCompleted(_) => {
                self.status = InspectionOutcome::Completed.resulting_status();
            }
            ListingEvent::HazardAnalysisRequired(_) => {
                self.status = InspectionOutcome::HazardAnalysisRequired.resulting_status();
            }
        }

        // One write per applied event, so this tracks the store revision.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ListingCommand::CreateListing(cmd) => self.handle_create(cmd),
            ListingCommand::TransferListing(cmd) => self.handle_transfer(cmd),
            ListingCommand::CheckProducts(cmd) => self.handle_check(cmd),
        }
    }
}

impl ProductListingContract {
    fn ensure_created(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!(
                "Product listing does not exist - {}",
                self.id
            )));
        }
        Ok(())
    }

    fn ensure_listing_id(&self, listing_id: &ListingId) -> Result<(), DomainError> {
        if &self.id != listing_id {
            return Err(DomainError::invariant("listing_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateListing) -> Result<Vec<ListingEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict(format!(
                "This product listing already exists - {}",
                cmd.listing_id
            )));
        }
        self.ensure_listing_id(&cmd.listing_id)?;

        Ok(vec![ListingEvent::ListingCreated(ListingCreated {
            listing_id: cmd.listing_id.clone(),
            supplier_id: cmd.supplier_id.clone(),
            products: cmd.products.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_transfer(&self, cmd: &TransferListing) -> Result<Vec<ListingEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_listing_id(&cmd.listing_id)?;

        match self.owner_type {
            // Leaving the supplier always starts the exemption check, whatever
            // the current status.
            OwnerType::Supplier => Ok(vec![ListingEvent::TransferredToImporter(
                TransferredToImporter {
                    listing_id: cmd.listing_id.clone(),
                    importer_id: cmd.new_owner.clone(),
                    occurred_at: cmd.occurred_at,
                },
            )]),
            OwnerType::Importer => {
                match self.status {
                    ListingStatus::ExemptCheckReq => {
                        return Err(DomainError::invalid_state(
                            "Products in listing need to be checked by regulator.",
                        ));
                    }
                    ListingStatus::HazardAnalysisCheckReq => {
                        return Err(DomainError::invalid_state(
                            "Products cannot be transferred as they've been flagged by regulator.",
                        ));
                    }
                    ListingStatus::InitialRequest | ListingStatus::CheckCompleted => {}
                }

                Ok(vec![ListingEvent::TransferredToRetailer(
                    TransferredToRetailer {
                        listing_id: cmd.listing_id.clone(),
                        retailer_id: cmd.new_owner.clone(),
                        products: self.products.clone(),
                        occurred_at: cmd.occurred_at,
                    },
                )])
            }
            OwnerType::Retailer => Err(DomainError::invalid_role("Invalid user type provided.")),
        }
    }

    fn handle_check(&self, cmd: &CheckProducts) -> Result<Vec<ListingEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_listing_id(&cmd.listing_id)?;

        if cmd.supplier.base.id != self.supplier {
            return Err(DomainError::invariant(format!(
                "supplier {} is not the supplier of listing {}",
                cmd.supplier.base.id, self.id
            )));
        }

        let regulator_id = cmd.regulator.id().clone();
        let event = match exemption::evaluate(self.status, &cmd.supplier, &cmd.regulator)? {
            InspectionOutcome::Completed => ListingEvent::InspectionCompleted(InspectionCompleted {
                listing_id: cmd.listing_id.clone(),
                regulator_id,
                occurred_at: cmd.occurred_at,
            }),
            InspectionOutcome::HazardAnalysisRequired => {
                ListingEvent::HazardAnalysisRequired(HazardAnalysisRequired {
                    listing_id: cmd.listing_id.clone(),
                    regulator_id,
                    org_id: cmd.supplier.org_id.clone(),
                    occurred_at: cmd.occurred_at,
                })
            }
        };

        Ok(vec![event])
    }
}
