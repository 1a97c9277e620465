//! Product hand-off owed to a retailer when a listing reaches retail custody.

use foodtrace_core::{DomainError, DomainResult, ParticipantId, ProductId};
use foodtrace_parties::Retailer;

use crate::listing::ListingEvent;

/// Delivery of a listing's products into a retailer's holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetailDelivery {
    pub retailer_id: ParticipantId,
    pub products: Vec<ProductId>,
}

impl RetailDelivery {
    /// The delivery implied by `event`, if it hands the listing to a retailer.
    pub fn from_event(event: &ListingEvent) -> Option<Self> {
        match event {
            ListingEvent::TransferredToRetailer(e) => Some(Self {
                retailer_id: e.retailer_id.clone(),
                products: e.products.clone(),
            }),
            _ => None,
        }
    }

    /// Append the delivered products to `retailer`'s holdings.
    pub fn deliver_to(&self, retailer: &mut Retailer) -> DomainResult<()> {
        if retailer.base.id != self.retailer_id {
            return Err(DomainError::invariant(format!(
                "delivery for retailer {} cannot be received by {}",
                self.retailer_id, retailer.base.id
            )));
        }
        retailer.receive_products(&self.products);
        Ok(())
    }
}
