//! Basho (tournament) domain model.
//!
//! # Invariants
//! - `start_date <= end_date`.
//! - `name` is non-empty after trimming.
//! - A basho row is created once per real-world tournament and only its
//!   name is ever corrected afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Integer surrogate key for a tournament (rowid-backed).
pub type BashoId = i64;

/// Persisted tournament record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basho {
    pub id: BashoId,
    /// Tournament name, e.g. `"Haru 2024"` or the venue location.
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Basho {
    /// Returns whether `date` falls within this tournament's date range.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Input for creating a tournament; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBasho {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewBasho {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
        }
    }

    /// Checks tournament invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { entity: "basho" });
        }
        if self.start_date > self.end_date {
            return Err(ValidationError::BashoDateRange {
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }
        Ok(())
    }
}
