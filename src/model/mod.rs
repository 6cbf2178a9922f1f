//! Domain model for sumo tournament records.
//!
//! # Responsibility
//! - Define the canonical shapes for basho, rikishi, measurements,
//!   banzuke participation and bouts.
//! - Hold all pure (non-SQL) invariant checks behind `validate()` methods.
//!
//! # Invariants
//! - Write paths must call `validate()` on the `New*` input before any SQL
//!   mutation; repositories never persist an invalid record.
//! - Rank and division values are closed enumerated domains, never free
//!   strings.

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

pub mod banzuke;
pub mod basho;
pub mod bout;
pub mod measurement;
pub mod rikishi;

use banzuke::{Division, Rank};
use rikishi::RikishiId;

/// A domain invariant violated by caller input.
///
/// Every variant carries the entity, field and offending value so callers
/// can correct the input without re-deriving context. Non-retryable.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName {
        entity: &'static str,
    },
    BashoDateRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    BirthNotBeforeDebut {
        birth_date: NaiveDate,
        debut_date: NaiveDate,
    },
    NonPositiveMeasurement {
        field: &'static str,
        value: f64,
    },
    RankOutsideDivision {
        rank: Rank,
        division: Division,
    },
    SelfBout {
        rikishi_id: RikishiId,
    },
    WinnerNotInBout {
        winner_id: RikishiId,
        rikishi1_id: RikishiId,
        rikishi2_id: RikishiId,
    },
    MatchDateOutsideBasho {
        match_date: NaiveDate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    DayOutOfRange {
        day: u8,
    },
    EmptyKimarite,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName { entity } => {
                write!(f, "{entity}.name must not be empty")
            }
            Self::BashoDateRange {
                start_date,
                end_date,
            } => write!(
                f,
                "basho.start_date {start_date} is after basho.end_date {end_date}"
            ),
            Self::BirthNotBeforeDebut {
                birth_date,
                debut_date,
            } => write!(
                f,
                "rikishi.birth_date {birth_date} must be before debut_date {debut_date}"
            ),
            Self::NonPositiveMeasurement { field, value } => {
                write!(f, "measurement.{field} must be positive, got {value}")
            }
            Self::RankOutsideDivision { rank, division } => {
                write!(f, "rank `{rank}` does not belong to division `{division}`")
            }
            Self::SelfBout { rikishi_id } => {
                write!(f, "match pairs rikishi {rikishi_id} against itself")
            }
            Self::WinnerNotInBout {
                winner_id,
                rikishi1_id,
                rikishi2_id,
            } => write!(
                f,
                "match.winner_id {winner_id} is neither rikishi {rikishi1_id} nor {rikishi2_id}"
            ),
            Self::MatchDateOutsideBasho {
                match_date,
                start_date,
                end_date,
            } => write!(
                f,
                "match_date {match_date} falls outside basho range {start_date}..={end_date}"
            ),
            Self::DayOutOfRange { day } => {
                write!(f, "match.day must be within 1..=15, got {day}")
            }
            Self::EmptyKimarite => write!(f, "match.kimarite must not be empty"),
        }
    }
}

impl Error for ValidationError {}
