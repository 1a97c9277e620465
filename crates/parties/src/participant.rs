use core::str::FromStr;

use serde::{Deserialize, Serialize};

use foodtrace_core::{DomainError, DomainResult, Entity, EntityKind, ParticipantId, ProductId};

/// Custody role of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Supplier,
    Importer,
    Retailer,
}

impl ParticipantRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipantRole::Supplier => "supplier",
            ParticipantRole::Importer => "importer",
            ParticipantRole::Retailer => "retailer",
        }
    }

    /// Namespace records of this role are stored under.
    pub fn entity_kind(self) -> EntityKind {
        match self {
            ParticipantRole::Supplier => EntityKind::Supplier,
            ParticipantRole::Importer => EntityKind::Importer,
            ParticipantRole::Retailer => EntityKind::Retailer,
        }
    }
}

impl core::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipantRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supplier" => Ok(ParticipantRole::Supplier),
            "importer" => Ok(ParticipantRole::Importer),
            "retailer" => Ok(ParticipantRole::Retailer),
            _ => Err(DomainError::validation(format!(
                "Invalid user type - '{s}', expecting supplier, importer or retailer"
            ))),
        }
    }
}

/// Fields shared by every role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBase {
    pub id: ParticipantId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(flatten)]
    pub base: UserBase,
    #[serde(rename = "countryId")]
    pub country_id: String,
    #[serde(rename = "orgId")]
    pub org_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Importer {
    #[serde(flatten)]
    pub base: UserBase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retailer {
    #[serde(flatten)]
    pub base: UserBase,
    /// Product ids held by the retailer, in arrival order.
    #[serde(default)]
    products: Vec<ProductId>,
}

impl Retailer {
    pub fn new(id: ParticipantId) -> Self {
        Self {
            base: UserBase { id },
            products: Vec::new(),
        }
    }

    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    /// Append delivered product ids after the existing holdings.
    ///
    /// Holdings only grow; nothing removes a product from a retailer.
    pub fn receive_products(&mut self, products: &[ProductId]) {
        self.products.extend_from_slice(products);
    }
}

/// A stored participant record, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Participant {
    Supplier(Supplier),
    Importer(Importer),
    Retailer(Retailer),
}

impl Participant {
    /// Build a participant record from registration arguments.
    ///
    /// `details` holds the role-specific positional fields: `countryId, orgId`
    /// for suppliers, nothing for importers and retailers.
    pub fn register(
        role: ParticipantRole,
        id: ParticipantId,
        details: &[String],
    ) -> DomainResult<Self> {
        let base = UserBase { id };
        match role {
            ParticipantRole::Supplier => match details {
                [country_id, org_id] => Ok(Participant::Supplier(Supplier {
                    base,
                    country_id: country_id.clone(),
                    org_id: org_id.clone(),
                })),
                _ => Err(DomainError::validation(
                    "Incorrect number of arguments. Expecting id, type, countryId and orgId for a supplier",
                )),
            },
            ParticipantRole::Importer => Ok(Participant::Importer(Importer { base })),
            ParticipantRole::Retailer => Ok(Participant::Retailer(Retailer::new(base.id))),
        }
    }

    pub fn role(&self) -> ParticipantRole {
        match self {
            Participant::Supplier(_) => ParticipantRole::Supplier,
            Participant::Importer(_) => ParticipantRole::Importer,
            Participant::Retailer(_) => ParticipantRole::Retailer,
        }
    }

    pub fn base(&self) -> &UserBase {
        match self {
            Participant::Supplier(s) => &s.base,
            Participant::Importer(i) => &i.base,
            Participant::Retailer(r) => &r.base,
        }
    }

    pub fn into_supplier(self) -> Option<Supplier> {
        match self {
            Participant::Supplier(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_retailer(self) -> Option<Retailer> {
        match self {
            Participant::Retailer(r) => Some(r),
            _ => None,
        }
    }
}

impl Entity for Participant {
    type Id = ParticipantId;

    fn id(&self) -> &Self::Id {
        &self.base().id
    }

    fn kind(&self) -> EntityKind {
        self.role().entity_kind()
    }
}
