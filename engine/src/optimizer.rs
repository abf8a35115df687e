//! Deterministic optimization transform
//!
//! Maps a validated [`DomainRecord`] to an [`OptimizationResult`] through two
//! bounded angle parameters. The numeric output depends on the record alone;
//! only `execution_time_ms` is measured.

use std::f64::consts::PI;
use std::time::Instant;

use shared::{ComponentId, DomainRecord, OptimizationResult, StateEntry, component_warn};

use crate::error::{EngineError, EngineResult};

/// Algorithm identifier reported with every result
pub const ALGORITHM_ID: &str = "QAOA-PUP-v1.2";

/// Fixed depth of the (cosmetic) two-layer circuit
pub const CIRCUIT_DEPTH: u32 = 8;

/// Largest relative swing the advantage factor can apply to the baseline
pub(crate) const ADVANTAGE_SWING: f64 = 0.12;

const BETA_SCALE: f64 = 0.3;
const GAMMA_SCALE: f64 = 0.4;

const CONFIDENCE_FLOOR: f64 = 0.75;
const CONFIDENCE_CEILING: f64 = 0.98;
const COHERENCE_WEIGHT: f64 = 0.23;

/// Angle parameters derived from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleParameters {
    pub beta: f64,
    pub gamma: f64,
}

impl AngleParameters {
    pub fn from_record(record: &DomainRecord) -> Self {
        let price_ratio = record.price_ratio();
        let volume_weight = (record.quantity + 1.0).ln() / 10.0;

        Self {
            beta: beta_angle(price_ratio),
            gamma: PI * volume_weight * GAMMA_SCALE,
        }
    }

    /// Labeled percentages, each a squared sine/cosine product times 100
    pub fn state_vector(&self) -> Vec<StateEntry> {
        let half_beta_cos2 = (self.beta / 2.0).cos().powi(2);
        let half_beta_sin2 = (self.beta / 2.0).sin().powi(2);

        vec![
            StateEntry::new("|00>", round_to(half_beta_cos2 * 100.0, 2)),
            StateEntry::new("|01>", round_to(half_beta_sin2 * self.gamma.cos().powi(2) * 100.0, 2)),
            StateEntry::new("|10>", round_to(half_beta_sin2 * self.gamma.sin().powi(2) * 100.0, 2)),
            StateEntry::new("|11>", round_to(half_beta_cos2 * (self.gamma / 2.0).sin().powi(2) * 100.0, 2)),
        ]
    }

    /// Multiplier applied to the baseline, within 1 ± 0.12
    pub fn advantage_factor(&self) -> f64 {
        let entanglement_boost = self.beta.sin() * self.gamma.cos();
        1.0 + entanglement_boost * ADVANTAGE_SWING
    }

    /// Confidence within [0.75, 0.98]
    pub fn confidence(&self) -> f64 {
        let coherence = (self.beta.cos() * self.gamma.sin()).abs();
        (CONFIDENCE_FLOOR + coherence * COHERENCE_WEIGHT).min(CONFIDENCE_CEILING)
    }
}

/// Stateless optimization engine
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizationEngine;

impl OptimizationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn algorithm(&self) -> &'static str {
        ALGORITHM_ID
    }

    /// Run the transform; total over validated records
    pub fn optimize(&self, record: &DomainRecord) -> OptimizationResult {
        let started = Instant::now();

        let angles = AngleParameters::from_record(record);
        let advantage_factor = angles.advantage_factor();
        let optimized_value = record.base_value * advantage_factor;
        let improvement = (optimized_value - record.base_value) / record.base_value * 100.0;

        OptimizationResult {
            optimized_value: round_to(optimized_value, 2),
            confidence: round_to(angles.confidence(), 3),
            state_vector: angles.state_vector(),
            baseline_value: record.base_value,
            improvement: round_to(improvement, 2),
            advantage_factor: round_to(advantage_factor, 4),
            algorithm: ALGORITHM_ID.to_string(),
            circuit_depth: CIRCUIT_DEPTH,
            execution_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Run the transform and reject results that overflowed
    pub fn optimize_checked(&self, record: &DomainRecord) -> EngineResult<OptimizationResult> {
        let result = self.optimize(record);
        match result.first_non_finite_field() {
            None => Ok(result),
            Some(field) => {
                component_warn!(
                    ComponentId::Engine,
                    material = %record.material_number,
                    field,
                    "Optimization overflowed"
                );
                Err(EngineError::NonFinite {
                    field,
                    execution_time_ms: result.execution_time_ms,
                })
            }
        }
    }
}

/// Mixing angle for a price ratio; infinite when the ratio is too large
pub(crate) fn beta_angle(price_ratio: f64) -> f64 {
    PI * price_ratio * BETA_SCALE
}

/// Round half away from zero; values too large to scale are returned as-is
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}
