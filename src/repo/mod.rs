//! Repository layer: typed access over the sumo schema.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per aggregate.
//! - Enforce cross-entity invariants the raw DDL cannot express
//!   (winner membership, temporal consistency, roster side effects).
//! - Isolate SQL details from callers.
//!
//! # Invariants
//! - Write paths validate input models before any SQL mutation.
//! - Multi-statement writes run inside one immediate transaction.
//! - Repositories surface semantic errors (`NotFound`, `Conflict`) in
//!   addition to transport errors, and never log-and-swallow.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::Connection;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::ValidationError;

pub mod basho_repo;
pub mod match_repo;
pub mod rikishi_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error taxonomy for repository operations.
///
/// `Validation` and `NotFound` are non-retryable caller mistakes.
/// `Conflict` is an engine-surfaced uniqueness or foreign-key violation;
/// retry with corrected data. `Db` is an engine failure; retry with
/// backoff if transient.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound {
        entity: &'static str,
        id: i64,
    },
    Conflict(String),
    Db(DbError),
    /// Persisted state fails domain parsing; read paths reject it instead
    /// of masking it.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(message) => write!(f, "constraint conflict: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(err, message)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Conflict(message.unwrap_or_else(|| err.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

/// Tables and columns a repository needs before it will accept a
/// connection.
pub(crate) struct TableRequirement {
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

/// Verifies the connection is migrated and carries the required schema.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    requirements: &[TableRequirement],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for requirement in requirements {
        if !table_exists(conn, requirement.table)? {
            return Err(RepoError::MissingRequiredTable(requirement.table));
        }
        for column in requirement.columns {
            if !table_has_column(conn, requirement.table, column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: requirement.table,
                    column,
                });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{table}\");"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Row-level existence check shared by foreign-key validation paths.
pub(crate) fn entity_exists(
    conn: &Connection,
    table: &'static str,
    id: i64,
) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(
                SELECT 1 FROM \"{table}\" WHERE id = ?1
            );"
        ),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Existence check that converts absence into `RepoError::NotFound`.
pub(crate) fn require_entity(
    conn: &Connection,
    table: &'static str,
    id: i64,
) -> RepoResult<()> {
    if entity_exists(conn, table, id)? {
        Ok(())
    } else {
        Err(RepoError::NotFound { entity: table, id })
    }
}
