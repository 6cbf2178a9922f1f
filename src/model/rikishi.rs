//! Rikishi (wrestler) domain model.
//!
//! # Invariants
//! - `birth_date < debut_date`.
//! - `name` is non-empty after trimming.
//! - `rank` is a nullable correction/display field; the authoritative
//!   per-tournament rank lives on the banzuke participation record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::banzuke::Rank;
use super::ValidationError;

/// Integer surrogate key for a wrestler (rowid-backed).
pub type RikishiId = i64;

/// Persisted wrestler record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rikishi {
    pub id: RikishiId,
    /// Ring name (shikona), romanized.
    pub name: String,
    /// Latest known rank, if recorded. Not used by any invariant.
    pub rank: Option<Rank>,
    pub debut_date: NaiveDate,
    pub birth_date: NaiveDate,
}

/// Input for registering a wrestler; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRikishi {
    pub name: String,
    pub debut_date: NaiveDate,
    pub birth_date: NaiveDate,
}

impl NewRikishi {
    pub fn new(name: impl Into<String>, debut_date: NaiveDate, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            debut_date,
            birth_date,
        }
    }

    /// Checks wrestler invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { entity: "rikishi" });
        }
        if self.birth_date >= self.debut_date {
            return Err(ValidationError::BirthNotBeforeDebut {
                birth_date: self.birth_date,
                debut_date: self.debut_date,
            });
        }
        Ok(())
    }
}
