use core::str::FromStr;

use serde::{Deserialize, Serialize};

use foodtrace_core::{DomainError, Entity, EntityKind, ProductId, RegulatorId};

/// Which exemption list an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExemptionListKind {
    Org,
    Product,
}

impl FromStr for ExemptionListKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "org" => Ok(ExemptionListKind::Org),
            "product" => Ok(ExemptionListKind::Product),
            _ => Err(DomainError::validation(format!(
                "Invalid exempted list type - '{s}', expecting org or product"
            ))),
        }
    }
}

/// Regulator record.
///
/// Both exemption lists are replaced wholesale on update; there is deliberately
/// no way to append a single id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulator {
    id: RegulatorId,
    #[serde(rename = "countryId")]
    country_id: String,
    #[serde(rename = "exemptedorgids", default)]
    exempted_org_ids: Vec<String>,
    #[serde(rename = "exemptedproductids", default)]
    exempted_product_ids: Vec<ProductId>,
}

impl Regulator {
    /// A freshly registered regulator exempts nothing.
    pub fn new(id: RegulatorId, country_id: impl Into<String>) -> Self {
        Self {
            id,
            country_id: country_id.into(),
            exempted_org_ids: Vec::new(),
            exempted_product_ids: Vec::new(),
        }
    }

    pub fn country_id(&self) -> &str {
        &self.country_id
    }

    pub fn exempted_org_ids(&self) -> &[String] {
        &self.exempted_org_ids
    }

    pub fn exempted_product_ids(&self) -> &[ProductId] {
        &self.exempted_product_ids
    }

    pub fn set_exempted_org_ids(&mut self, org_ids: Vec<String>) {
        self.exempted_org_ids = org_ids;
    }

    pub fn set_exempted_product_ids(&mut self, product_ids: Vec<ProductId>) {
        self.exempted_product_ids = product_ids;
    }

    /// Replace the list selected by `kind` with `ids`.
    pub fn replace_exempted(&mut self, kind: ExemptionListKind, ids: Vec<String>) {
        match kind {
            ExemptionListKind::Org => self.set_exempted_org_ids(ids),
            ExemptionListKind::Product => {
                self.set_exempted_product_ids(ids.into_iter().map(ProductId::from).collect())
            }
        }
    }

    pub fn lists_org(&self, org_id: &str) -> bool {
        self.exempted_org_ids.iter().any(|o| o == org_id)
    }
}

impl Entity for Regulator {
    type Id = RegulatorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Regulator
    }
}
