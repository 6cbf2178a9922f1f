//! Basho repository: tournament registry and banzuke roster.
//!
//! # Responsibility
//! - Provide tournament CRUD plus the name correction path.
//! - Own roster entry upsert semantics (one row per rikishi per basho,
//!   latest rank/division wins).
//! - Serve the ordered roster read (division, then rank, then name).
//!
//! # Invariants
//! - `enter_roster` rejects a rank whose title is outside the division.
//! - Roster foreign keys are verified in the same transaction as the
//!   upsert.

use rusqlite::{params, Connection, Row, TransactionBehavior};

use crate::model::banzuke::{BashoRikishi, Division, Rank};
use crate::model::basho::{Basho, BashoId, NewBasho};
use crate::model::rikishi::{Rikishi, RikishiId};
use crate::model::ValidationError;
use crate::repo::rikishi_repo::parse_rikishi_row;
use crate::repo::{
    ensure_connection_ready, require_entity, RepoError, RepoResult, TableRequirement,
};

const BASHO_SELECT_SQL: &str = "SELECT
    id,
    name,
    start_date,
    end_date
FROM basho";

const REQUIRED_TABLES: &[TableRequirement] = &[
    TableRequirement {
        table: "basho",
        columns: &["id", "name", "start_date", "end_date"],
    },
    TableRequirement {
        table: "rikishi",
        columns: &["id", "name", "rank", "debut_date", "birth_date"],
    },
    TableRequirement {
        table: "basho_rikishi",
        columns: &["basho_id", "rikishi_id", "rank", "division", "rank_value"],
    },
];

/// Repository interface for tournament and roster operations.
pub trait BashoRepository {
    /// Creates one tournament and returns its storage-assigned id.
    fn create_basho(&mut self, basho: &NewBasho) -> RepoResult<BashoId>;
    /// Gets one tournament by id.
    fn get_basho(&self, id: BashoId) -> RepoResult<Option<Basho>>;
    /// Lists all tournaments in chronological order.
    fn list_bashos(&self) -> RepoResult<Vec<Basho>>;
    /// Correction path: replaces the tournament's name.
    fn update_basho_name(&mut self, id: BashoId, name: &str) -> RepoResult<()>;
    /// Enters (or re-enters) a wrestler into the tournament roster.
    /// Idempotent per `(basho_id, rikishi_id)`; the latest rank/division
    /// overwrite earlier values.
    fn enter_roster(
        &mut self,
        basho_id: BashoId,
        rikishi_id: RikishiId,
        rank: Rank,
        division: Division,
    ) -> RepoResult<()>;
    /// Full roster for one tournament, ordered by division (banzuke
    /// order), then rank ordering value (NULLs last), then name.
    fn roster(&self, basho_id: BashoId) -> RepoResult<Vec<(Rikishi, BashoRikishi)>>;
}

/// SQLite-backed basho repository.
pub struct SqliteBashoRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBashoRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl BashoRepository for SqliteBashoRepository<'_> {
    fn create_basho(&mut self, basho: &NewBasho) -> RepoResult<BashoId> {
        basho.validate()?;

        self.conn.execute(
            "INSERT INTO basho (name, start_date, end_date)
             VALUES (?1, ?2, ?3);",
            params![basho.name.as_str(), basho.start_date, basho.end_date],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_basho(&self, id: BashoId) -> RepoResult<Option<Basho>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BASHO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_basho_row(row)?));
        }

        Ok(None)
    }

    fn list_bashos(&self) -> RepoResult<Vec<Basho>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BASHO_SELECT_SQL} ORDER BY start_date ASC, id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut bashos = Vec::new();
        while let Some(row) = rows.next()? {
            bashos.push(parse_basho_row(row)?);
        }

        Ok(bashos)
    }

    fn update_basho_name(&mut self, id: BashoId, name: &str) -> RepoResult<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName { entity: "basho" }.into());
        }

        let changed = self.conn.execute(
            "UPDATE basho SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "basho",
                id,
            });
        }

        Ok(())
    }

    fn enter_roster(
        &mut self,
        basho_id: BashoId,
        rikishi_id: RikishiId,
        rank: Rank,
        division: Division,
    ) -> RepoResult<()> {
        if rank.title.division() != division {
            return Err(ValidationError::RankOutsideDivision { rank, division }.into());
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        require_entity(&tx, "basho", basho_id)?;
        require_entity(&tx, "rikishi", rikishi_id)?;

        tx.execute(
            "INSERT INTO basho_rikishi (basho_id, rikishi_id, rank, division, rank_value)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (basho_id, rikishi_id) DO UPDATE SET
                rank = excluded.rank,
                division = excluded.division,
                rank_value = excluded.rank_value;",
            params![
                basho_id,
                rikishi_id,
                rank.to_string(),
                division.as_str(),
                rank.ordering_value(),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn roster(&self, basho_id: BashoId) -> RepoResult<Vec<(Rikishi, BashoRikishi)>> {
        require_entity(self.conn, "basho", basho_id)?;

        let sql = format!(
            "SELECT
                r.id,
                r.name,
                r.rank,
                r.debut_date,
                r.birth_date,
                br.basho_id,
                br.rikishi_id,
                br.rank AS banzuke_rank,
                br.division,
                br.rank_value
             FROM basho_rikishi br
             INNER JOIN rikishi r ON r.id = br.rikishi_id
             WHERE br.basho_id = ?1
             ORDER BY {},
                br.rank_value IS NULL,
                br.rank_value ASC,
                r.name ASC;",
            division_order_case()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([basho_id])?;
        let mut roster = Vec::new();
        while let Some(row) = rows.next()? {
            let rikishi = parse_rikishi_row(row)?;
            let entry = parse_basho_rikishi_row(row)?;
            roster.push((rikishi, entry));
        }

        Ok(roster)
    }
}

fn parse_basho_row(row: &Row<'_>) -> RepoResult<Basho> {
    Ok(Basho {
        id: row.get("id")?,
        name: row.get("name")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
    })
}

pub(crate) fn parse_basho_rikishi_row(row: &Row<'_>) -> RepoResult<BashoRikishi> {
    let rank = match row.get::<_, Option<String>>("banzuke_rank")? {
        Some(value) => Some(Rank::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid rank value `{value}` in basho_rikishi.rank"
            ))
        })?),
        None => None,
    };

    let division = match row.get::<_, Option<String>>("division")? {
        Some(value) => Some(Division::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid division value `{value}` in basho_rikishi.division"
            ))
        })?),
        None => None,
    };

    Ok(BashoRikishi {
        basho_id: row.get("basho_id")?,
        rikishi_id: row.get("rikishi_id")?,
        rank,
        division,
        rank_value: row.get("rank_value")?,
    })
}

// Orders divisions by their banzuke position; NULL divisions (membership
// rows created by the match side effect) sort last.
fn division_order_case() -> String {
    let mut case = String::from("CASE br.division");
    for division in Division::ALL {
        case.push_str(&format!(
            " WHEN '{}' THEN {}",
            division.as_str(),
            division.banzuke_order()
        ));
    }
    case.push_str(&format!(" ELSE {} END", Division::ALL.len()));
    case
}
