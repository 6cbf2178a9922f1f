//! Core data-access layer for sumo tournament records.
//! This crate is the single source of truth for the schema's invariants:
//! referential integrity, uniqueness and temporal consistency that the raw
//! DDL alone cannot express.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::banzuke::{BashoRikishi, Division, Rank, RankTitle, Side};
pub use model::basho::{Basho, BashoId, NewBasho};
pub use model::bout::{Match, MatchId, NewMatch};
pub use model::measurement::{Measurement, MeasurementId, NewMeasurement};
pub use model::rikishi::{NewRikishi, Rikishi, RikishiId};
pub use model::ValidationError;
pub use repo::basho_repo::{BashoRepository, SqliteBashoRepository};
pub use repo::match_repo::{MatchRepository, SqliteMatchRepository};
pub use repo::rikishi_repo::{RikishiRepository, SqliteRikishiRepository};
pub use repo::{RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
