//! Input validation for domain records
//!
//! Rules run in a fixed order and every violation is collected; a candidate
//! either becomes a complete [`DomainRecord`] or is rejected with the names of
//! all offending fields. Optional identifiers are default-substituted
//! explicitly from [`FieldDefaults`] rather than treated as required.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use shared::DomainRecord;

use crate::error::ValidationError;
use crate::optimizer::{ADVANTAGE_SWING, beta_angle};

/// Wire names of the record fields
pub mod fields {
    pub const COMPANY_CODE: &str = "CompanyCode";
    pub const MATERIAL_NUMBER: &str = "MaterialNumber";
    pub const PLANT: &str = "Plant";
    pub const PERIOD: &str = "Period";
    pub const BASE_VALUE: &str = "PUPValue";
    pub const REFERENCE_PRICE: &str = "StandardPrice";
    pub const MOVING_PRICE: &str = "MovingPrice";
    pub const QUANTITY: &str = "Quantity";
    pub const VALUATION_CLASS: &str = "ValuationClass";

    /// Fields that must be present, in the order violations are reported
    pub const REQUIRED: [&str; 5] = [COMPANY_CODE, MATERIAL_NUMBER, BASE_VALUE, REFERENCE_PRICE, QUANTITY];
}

/// Substitutes for optional identifiers the caller left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefaults {
    pub plant: String,
    pub valuation_class: String,
    /// Fixed period; `None` means the current UTC month at validation time
    pub period: Option<String>,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            plant: "P001".to_string(),
            valuation_class: "3000".to_string(),
            period: None,
        }
    }
}

/// Stateless validator for record candidates
#[derive(Debug, Clone, Default)]
pub struct Validator {
    defaults: FieldDefaults,
}

impl Validator {
    pub fn new(defaults: FieldDefaults) -> Self {
        Self { defaults }
    }

    /// Validate a candidate against the current clock
    pub fn validate(&self, candidate: &Value) -> Result<DomainRecord, ValidationError> {
        self.validate_at(candidate, Utc::now())
    }

    /// Validate a candidate; `now` only feeds the default period
    pub fn validate_at(&self, candidate: &Value, now: DateTime<Utc>) -> Result<DomainRecord, ValidationError> {
        let empty = Map::new();
        let object = candidate.as_object().unwrap_or(&empty);
        let mut violations = Vec::new();

        let company_code = required_identifier(object, fields::COMPANY_CODE, &mut violations);
        let material_number = required_identifier(object, fields::MATERIAL_NUMBER, &mut violations);
        let base_value = required_positive(object, fields::BASE_VALUE, &mut violations);
        let reference_price = required_positive(object, fields::REFERENCE_PRICE, &mut violations);
        if let (Some(base), Some(reference)) = (base_value, reference_price) {
            violations.extend(out_of_range(base, reference).iter().map(|field| field.to_string()));
        }
        let quantity = required_positive(object, fields::QUANTITY, &mut violations);
        let moving_price = optional_finite(object, fields::MOVING_PRICE, &mut violations);

        match (company_code, material_number, base_value, reference_price, quantity) {
            (Some(company_code), Some(material_number), Some(base_value), Some(reference_price), Some(quantity))
                if violations.is_empty() =>
            {
                Ok(DomainRecord {
                    company_code,
                    material_number,
                    plant: identifier(object.get(fields::PLANT)).unwrap_or_else(|| self.defaults.plant.clone()),
                    period: identifier(object.get(fields::PERIOD)).unwrap_or_else(|| self.default_period(now)),
                    base_value,
                    reference_price,
                    moving_price,
                    quantity,
                    valuation_class: identifier(object.get(fields::VALUATION_CLASS))
                        .unwrap_or_else(|| self.defaults.valuation_class.clone()),
                })
            }
            _ => Err(ValidationError::new(violations)),
        }
    }

    fn default_period(&self, now: DateTime<Utc>) -> String {
        self.defaults
            .period
            .clone()
            .unwrap_or_else(|| now.format("%Y-%m").to_string())
    }
}

/// Non-empty string, or a number rendered as one
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite number from a JSON number or numeric string
fn finite_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Magnitudes whose price angle or optimized value would overflow `f64`
fn out_of_range(base_value: f64, reference_price: f64) -> &'static [&'static str] {
    if !beta_angle(base_value / reference_price).is_finite() {
        &[fields::BASE_VALUE, fields::REFERENCE_PRICE]
    } else if !(base_value * (1.0 + ADVANTAGE_SWING)).is_finite() {
        &[fields::BASE_VALUE]
    } else {
        &[]
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn required_identifier(object: &Map<String, Value>, field: &str, violations: &mut Vec<String>) -> Option<String> {
    let value = identifier(object.get(field));
    if value.is_none() {
        violations.push(field.to_string());
    }
    value
}

fn required_positive(object: &Map<String, Value>, field: &str, violations: &mut Vec<String>) -> Option<f64> {
    let raw = object.get(field);
    let value = if is_absent(raw) {
        None
    } else {
        raw.and_then(finite_number).filter(|v| *v > 0.0)
    };
    if value.is_none() {
        violations.push(field.to_string());
    }
    value
}

fn optional_finite(object: &Map<String, Value>, field: &str, violations: &mut Vec<String>) -> Option<f64> {
    let raw = object.get(field);
    if is_absent(raw) {
        return None;
    }
    let value = raw.and_then(finite_number);
    if value.is_none() {
        violations.push(field.to_string());
    }
    value
}
