//! Match repository: bout results and head-to-head reads.
//!
//! # Responsibility
//! - Record bouts with full cross-entity validation (winner membership,
//!   distinct opponents, date within the tournament range).
//! - Guarantee the roster side effect: inserting a bout implies both
//!   opponents are on that tournament's roster, atomically with the
//!   insert.
//! - Serve chronologically ordered head-to-head and per-basho reads.
//!
//! # Invariants
//! - `record_match` runs as one immediate transaction; a failed check
//!   leaves no rows behind.
//! - Bout rows are append-only; `delete_match` exists solely for
//!   data-entry error recovery.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, TransactionBehavior};

use crate::model::basho::BashoId;
use crate::model::bout::{Match, MatchId, NewMatch};
use crate::model::rikishi::RikishiId;
use crate::model::ValidationError;
use crate::repo::{
    ensure_connection_ready, require_entity, RepoError, RepoResult, TableRequirement,
};

const MATCH_SELECT_SQL: &str = "SELECT
    id,
    basho_id,
    rikishi1_id,
    rikishi2_id,
    winner_id,
    kimarite,
    day,
    match_date
FROM match";

const REQUIRED_TABLES: &[TableRequirement] = &[
    TableRequirement {
        table: "match",
        columns: &[
            "id",
            "basho_id",
            "rikishi1_id",
            "rikishi2_id",
            "winner_id",
            "kimarite",
            "day",
            "match_date",
        ],
    },
    TableRequirement {
        table: "basho",
        columns: &["id", "start_date", "end_date"],
    },
    TableRequirement {
        table: "basho_rikishi",
        columns: &["basho_id", "rikishi_id"],
    },
];

/// Repository interface for bout operations.
pub trait MatchRepository {
    /// Records one bout and returns its storage-assigned id. Both
    /// opponents gain a minimal roster row for the tournament when they
    /// have none, in the same transaction.
    fn record_match(&mut self, bout: &NewMatch) -> RepoResult<MatchId>;
    /// Gets one bout by id.
    fn get_match(&self, id: MatchId) -> RepoResult<Option<Match>>;
    /// All bouts between the two wrestlers, in either position,
    /// chronologically ordered. Empty when they never met. Each call runs
    /// one fresh query, so the sequence restarts from the beginning.
    fn head_to_head(
        &self,
        rikishi_a: RikishiId,
        rikishi_b: RikishiId,
    ) -> RepoResult<Vec<Match>>;
    /// Bouts of one tournament, optionally narrowed to a single day,
    /// ordered by day then id.
    fn matches_for_basho(
        &self,
        basho_id: BashoId,
        day: Option<u8>,
    ) -> RepoResult<Vec<Match>>;
    /// Data-entry error recovery only; bouts are otherwise append-only.
    fn delete_match(&mut self, id: MatchId) -> RepoResult<()>;
}

/// SQLite-backed match repository.
pub struct SqliteMatchRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteMatchRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl MatchRepository for SqliteMatchRepository<'_> {
    fn record_match(&mut self, bout: &NewMatch) -> RepoResult<MatchId> {
        bout.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let basho_range: Option<(NaiveDate, NaiveDate)> = {
            let mut stmt =
                tx.prepare("SELECT start_date, end_date FROM basho WHERE id = ?1;")?;
            let mut rows = stmt.query([bout.basho_id])?;
            match rows.next()? {
                Some(row) => Some((row.get(0)?, row.get(1)?)),
                None => None,
            }
        };
        let (start_date, end_date) = basho_range.ok_or(RepoError::NotFound {
            entity: "basho",
            id: bout.basho_id,
        })?;

        if bout.match_date < start_date || bout.match_date > end_date {
            return Err(ValidationError::MatchDateOutsideBasho {
                match_date: bout.match_date,
                start_date,
                end_date,
            }
            .into());
        }

        require_entity(&tx, "rikishi", bout.rikishi1_id)?;
        require_entity(&tx, "rikishi", bout.rikishi2_id)?;

        // Roster side effect: membership-only rows, never overwriting an
        // entered rank.
        for rikishi_id in [bout.rikishi1_id, bout.rikishi2_id] {
            tx.execute(
                "INSERT OR IGNORE INTO basho_rikishi (basho_id, rikishi_id, rank, division)
                 VALUES (?1, ?2, NULL, NULL);",
                params![bout.basho_id, rikishi_id],
            )?;
        }

        tx.execute(
            "INSERT INTO match (
                basho_id,
                rikishi1_id,
                rikishi2_id,
                winner_id,
                kimarite,
                day,
                match_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                bout.basho_id,
                bout.rikishi1_id,
                bout.rikishi2_id,
                bout.winner_id,
                bout.kimarite.as_str(),
                bout.day,
                bout.match_date,
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(id)
    }

    fn get_match(&self, id: MatchId) -> RepoResult<Option<Match>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MATCH_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_match_row(row)?));
        }

        Ok(None)
    }

    fn head_to_head(
        &self,
        rikishi_a: RikishiId,
        rikishi_b: RikishiId,
    ) -> RepoResult<Vec<Match>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MATCH_SELECT_SQL}
             WHERE (rikishi1_id = ?1 AND rikishi2_id = ?2)
                OR (rikishi1_id = ?2 AND rikishi2_id = ?1)
             ORDER BY match_date ASC, day ASC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![rikishi_a, rikishi_b])?;
        let mut matches = Vec::new();
        while let Some(row) = rows.next()? {
            matches.push(parse_match_row(row)?);
        }

        Ok(matches)
    }

    fn matches_for_basho(
        &self,
        basho_id: BashoId,
        day: Option<u8>,
    ) -> RepoResult<Vec<Match>> {
        require_entity(self.conn, "basho", basho_id)?;

        let mut sql = format!("{MATCH_SELECT_SQL} WHERE basho_id = ?1");
        if day.is_some() {
            sql.push_str(" AND day = ?2");
        }
        sql.push_str(" ORDER BY day ASC, id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut matches = Vec::new();
        match day {
            Some(day) => {
                let mut rows = stmt.query(params![basho_id, day])?;
                while let Some(row) = rows.next()? {
                    matches.push(parse_match_row(row)?);
                }
            }
            None => {
                let mut rows = stmt.query([basho_id])?;
                while let Some(row) = rows.next()? {
                    matches.push(parse_match_row(row)?);
                }
            }
        }

        Ok(matches)
    }

    fn delete_match(&mut self, id: MatchId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM match WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "match",
                id,
            });
        }

        Ok(())
    }
}

fn parse_match_row(row: &Row<'_>) -> RepoResult<Match> {
    let day: i64 = row.get("day")?;
    let day = u8::try_from(day)
        .map_err(|_| RepoError::InvalidData(format!("invalid day value `{day}` in match.day")))?;

    Ok(Match {
        id: row.get("id")?,
        basho_id: row.get("basho_id")?,
        rikishi1_id: row.get("rikishi1_id")?,
        rikishi2_id: row.get("rikishi2_id")?,
        winner_id: row.get("winner_id")?,
        kimarite: row.get("kimarite")?,
        day,
        match_date: row.get("match_date")?,
    })
}
