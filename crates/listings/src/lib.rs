//! Product listing lifecycle (custody hops and regulatory inspection).
//!
//! This crate contains the business rules for listings, implemented purely as
//! deterministic domain logic (no IO, no storage):
//!
//! - `listing`: the listing aggregate and its state machine
//! - `exemption`: the regulator's exemption evaluation
//! - `custody`: the product hand-off owed to a retailer

pub mod custody;
pub mod exemption;
pub mod listing;

pub use custody::RetailDelivery;
pub use exemption::{InspectionOutcome, evaluate};
pub use listing::{
    CheckProducts, CreateListing, HazardAnalysisRequired, InspectionCompleted, ListingCommand,
    ListingCreated, ListingEvent, ListingStatus, OwnerType, ProductListingContract,
    TransferListing, TransferredToImporter, TransferredToRetailer,
};
