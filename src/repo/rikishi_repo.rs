//! Rikishi repository: wrestler registry and per-tournament measurements.
//!
//! # Responsibility
//! - Provide wrestler CRUD plus the rare name/rank correction paths.
//! - Own measurement upsert semantics (one row per rikishi per basho).
//!
//! # Invariants
//! - Write paths validate input models before SQL mutations.
//! - `record_measurement` verifies both foreign keys inside the same
//!   transaction as the upsert.

use rusqlite::{params, Connection, Row, TransactionBehavior};

use crate::model::banzuke::Rank;
use crate::model::basho::BashoId;
use crate::model::measurement::{Measurement, NewMeasurement};
use crate::model::rikishi::{NewRikishi, Rikishi, RikishiId};
use crate::model::ValidationError;
use crate::repo::{
    ensure_connection_ready, require_entity, RepoError, RepoResult, TableRequirement,
};

const RIKISHI_SELECT_SQL: &str = "SELECT
    id,
    name,
    rank,
    debut_date,
    birth_date
FROM rikishi";

const REQUIRED_TABLES: &[TableRequirement] = &[
    TableRequirement {
        table: "rikishi",
        columns: &["id", "name", "rank", "debut_date", "birth_date"],
    },
    TableRequirement {
        table: "measurement",
        columns: &["id", "rikishi_id", "basho_id", "height_cm", "weight_kg"],
    },
    TableRequirement {
        table: "basho",
        columns: &["id", "start_date"],
    },
];

/// Repository interface for wrestler and measurement operations.
pub trait RikishiRepository {
    /// Registers one wrestler and returns its storage-assigned id.
    fn create_rikishi(&mut self, rikishi: &NewRikishi) -> RepoResult<RikishiId>;
    /// Gets one wrestler by id.
    fn get_rikishi(&self, id: RikishiId) -> RepoResult<Option<Rikishi>>;
    /// Correction path: replaces the wrestler's name.
    fn update_rikishi_name(&mut self, id: RikishiId, name: &str) -> RepoResult<()>;
    /// Correction path: replaces the wrestler's display rank.
    fn set_rikishi_rank(&mut self, id: RikishiId, rank: Option<Rank>) -> RepoResult<()>;
    /// Upserts the measurement for `(rikishi_id, basho_id)`.
    fn record_measurement(&mut self, measurement: &NewMeasurement) -> RepoResult<()>;
    /// Gets the measurement taken at one tournament, if recorded.
    fn measurement_for(
        &self,
        rikishi_id: RikishiId,
        basho_id: BashoId,
    ) -> RepoResult<Option<Measurement>>;
    /// Lists all measurements for one wrestler, ordered by tournament
    /// start date.
    fn measurement_history(&self, rikishi_id: RikishiId) -> RepoResult<Vec<Measurement>>;
}

/// SQLite-backed rikishi repository.
pub struct SqliteRikishiRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRikishiRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl RikishiRepository for SqliteRikishiRepository<'_> {
    fn create_rikishi(&mut self, rikishi: &NewRikishi) -> RepoResult<RikishiId> {
        rikishi.validate()?;

        self.conn.execute(
            "INSERT INTO rikishi (name, rank, debut_date, birth_date)
             VALUES (?1, NULL, ?2, ?3);",
            params![
                rikishi.name.as_str(),
                rikishi.debut_date,
                rikishi.birth_date,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_rikishi(&self, id: RikishiId) -> RepoResult<Option<Rikishi>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RIKISHI_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_rikishi_row(row)?));
        }

        Ok(None)
    }

    fn update_rikishi_name(&mut self, id: RikishiId, name: &str) -> RepoResult<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName { entity: "rikishi" }.into());
        }

        let changed = self.conn.execute(
            "UPDATE rikishi SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "rikishi",
                id,
            });
        }

        Ok(())
    }

    fn set_rikishi_rank(&mut self, id: RikishiId, rank: Option<Rank>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE rikishi SET rank = ?2 WHERE id = ?1;",
            params![id, rank.map(|value| value.to_string())],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "rikishi",
                id,
            });
        }

        Ok(())
    }

    fn record_measurement(&mut self, measurement: &NewMeasurement) -> RepoResult<()> {
        measurement.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        require_entity(&tx, "rikishi", measurement.rikishi_id)?;
        require_entity(&tx, "basho", measurement.basho_id)?;

        tx.execute(
            "INSERT INTO measurement (rikishi_id, basho_id, height_cm, weight_kg)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (rikishi_id, basho_id) DO UPDATE SET
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg;",
            params![
                measurement.rikishi_id,
                measurement.basho_id,
                measurement.height_cm,
                measurement.weight_kg,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn measurement_for(
        &self,
        rikishi_id: RikishiId,
        basho_id: BashoId,
    ) -> RepoResult<Option<Measurement>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, rikishi_id, basho_id, height_cm, weight_kg
             FROM measurement
             WHERE rikishi_id = ?1 AND basho_id = ?2;",
        )?;

        let mut rows = stmt.query(params![rikishi_id, basho_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_measurement_row(row)?));
        }

        Ok(None)
    }

    fn measurement_history(&self, rikishi_id: RikishiId) -> RepoResult<Vec<Measurement>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.rikishi_id, m.basho_id, m.height_cm, m.weight_kg
             FROM measurement m
             INNER JOIN basho b ON b.id = m.basho_id
             WHERE m.rikishi_id = ?1
             ORDER BY b.start_date ASC, m.basho_id ASC;",
        )?;

        let mut rows = stmt.query([rikishi_id])?;
        let mut measurements = Vec::new();
        while let Some(row) = rows.next()? {
            measurements.push(parse_measurement_row(row)?);
        }

        Ok(measurements)
    }
}

pub(crate) fn parse_rikishi_row(row: &Row<'_>) -> RepoResult<Rikishi> {
    let rank = match row.get::<_, Option<String>>("rank")? {
        Some(value) => Some(Rank::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid rank value `{value}` in rikishi.rank"))
        })?),
        None => None,
    };

    Ok(Rikishi {
        id: row.get("id")?,
        name: row.get("name")?,
        rank,
        debut_date: row.get("debut_date")?,
        birth_date: row.get("birth_date")?,
    })
}

fn parse_measurement_row(row: &Row<'_>) -> RepoResult<Measurement> {
    Ok(Measurement {
        id: row.get(0)?,
        rikishi_id: row.get(1)?,
        basho_id: row.get(2)?,
        height_cm: row.get(3)?,
        weight_kg: row.get(4)?,
    })
}
