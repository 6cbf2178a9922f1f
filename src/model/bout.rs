//! Bout (match) domain model.
//!
//! # Invariants
//! - `winner_id` is one of the two opponents.
//! - A rikishi never faces itself.
//! - `day` is within 1..=15 and `kimarite` is non-empty.
//! - `match_date` must fall within the tournament's date range; that check
//!   needs the basho row and is enforced by the match repository.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::basho::BashoId;
use super::rikishi::RikishiId;
use super::ValidationError;

/// Integer surrogate key for a bout (rowid-backed).
pub type MatchId = i64;

/// Tournament days run 1 through 15.
pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 15;

/// Persisted bout record. Append-only; deletion exists solely for
/// data-entry error recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub basho_id: BashoId,
    pub rikishi1_id: RikishiId,
    pub rikishi2_id: RikishiId,
    pub winner_id: RikishiId,
    /// Winning technique, e.g. `"yorikiri"`.
    pub kimarite: String,
    pub day: u8,
    pub match_date: NaiveDate,
}

impl Match {
    /// The opponent who lost the bout.
    pub fn loser_id(&self) -> RikishiId {
        if self.winner_id == self.rikishi1_id {
            self.rikishi2_id
        } else {
            self.rikishi1_id
        }
    }

    /// Returns whether `rikishi_id` fought in this bout.
    pub fn involves(&self, rikishi_id: RikishiId) -> bool {
        self.rikishi1_id == rikishi_id || self.rikishi2_id == rikishi_id
    }
}

/// Input for recording a bout; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub basho_id: BashoId,
    pub rikishi1_id: RikishiId,
    pub rikishi2_id: RikishiId,
    pub winner_id: RikishiId,
    pub kimarite: String,
    pub day: u8,
    pub match_date: NaiveDate,
}

impl NewMatch {
    /// Checks every bout invariant that does not need the basho row.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rikishi1_id == self.rikishi2_id {
            return Err(ValidationError::SelfBout {
                rikishi_id: self.rikishi1_id,
            });
        }
        if self.winner_id != self.rikishi1_id && self.winner_id != self.rikishi2_id {
            return Err(ValidationError::WinnerNotInBout {
                winner_id: self.winner_id,
                rikishi1_id: self.rikishi1_id,
                rikishi2_id: self.rikishi2_id,
            });
        }
        if !(FIRST_DAY..=LAST_DAY).contains(&self.day) {
            return Err(ValidationError::DayOutOfRange { day: self.day });
        }
        if self.kimarite.trim().is_empty() {
            return Err(ValidationError::EmptyKimarite);
        }
        Ok(())
    }
}
