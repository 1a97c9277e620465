use serde::{Deserialize, Serialize};

use foodtrace_core::{Entity, EntityKind, ProductId};

/// Product record as stored in the ledger.
///
/// `quantity` is carried verbatim; nothing in the custody logic computes with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    quantity: String,
    #[serde(rename = "countryId")]
    country_id: String,
}

impl Product {
    pub fn new(id: ProductId, quantity: impl Into<String>, country_id: impl Into<String>) -> Self {
        Self {
            id,
            quantity: quantity.into(),
            country_id: country_id.into(),
        }
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn country_id(&self) -> &str {
        &self.country_id
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Product
    }
}
