//! Domain record message type

use serde::{Deserialize, Serialize};

/// A validated business record
///
/// Only the validator constructs these from untrusted input; by the time a
/// `DomainRecord` exists, `base_value`, `reference_price` and `quantity` are
/// finite and strictly positive and every identifier is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainRecord {
    pub company_code: String,
    pub material_number: String,
    pub plant: String,
    pub period: String,
    #[serde(rename = "PUPValue")]
    pub base_value: f64,
    #[serde(rename = "StandardPrice")]
    pub reference_price: f64,
    pub moving_price: Option<f64>,
    pub quantity: f64,
    pub valuation_class: String,
}

impl DomainRecord {
    /// Ratio of the base value to the reference price
    pub fn price_ratio(&self) -> f64 {
        self.base_value / self.reference_price
    }
}
