//! Per-tournament body measurement model.
//!
//! # Invariants
//! - `height_cm > 0` and `weight_kg > 0`.
//! - At most one measurement per `(rikishi_id, basho_id)`; re-recording
//!   replaces the previous values.

use serde::{Deserialize, Serialize};

use super::basho::BashoId;
use super::rikishi::RikishiId;
use super::ValidationError;

/// Integer surrogate key for a measurement row (rowid-backed).
pub type MeasurementId = i64;

/// Persisted measurement taken at a specific tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: MeasurementId,
    pub rikishi_id: RikishiId,
    pub basho_id: BashoId,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Input for recording a measurement; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub rikishi_id: RikishiId,
    pub basho_id: BashoId,
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl NewMeasurement {
    /// Checks measurement invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.height_cm > 0.0) {
            return Err(ValidationError::NonPositiveMeasurement {
                field: "height_cm",
                value: self.height_cm,
            });
        }
        if !(self.weight_kg > 0.0) {
            return Err(ValidationError::NonPositiveMeasurement {
                field: "weight_kg",
                value: self.weight_kg,
            });
        }
        Ok(())
    }
}
