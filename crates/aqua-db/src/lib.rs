//! # aqua-db
//!
//! Storage layer for AquaKeeper.
//! Manages the single SQLite database at `$AQUA_DATA_DIR/aquakeeper.db`.
//!
//! ## Schema
//!
//! - WAL mode
//! - Foreign keys enforced; every child row cascades with its aquarium,
//!   every aquarium with its user
//! - All timestamps are Unix epoch seconds
//! - Schema version stored in `PRAGMA user_version`

pub mod migrations;
pub mod queries;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("chemistry error: {0}")]
    Chem(#[from] aqua_chem::ChemError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = msg.unwrap_or_else(|| code.to_string());
                tracing::debug!(%detail, "constraint violation");
                DbError::Constraint(detail)
            }
            other => DbError::Sqlite(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Map `QueryReturnedNoRows` to [`DbError::NotFound`].
pub(crate) fn not_found(what: impl Into<String>) -> impl FnOnce(rusqlite::Error) -> DbError {
    let what = what.into();
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(what),
        other => DbError::from(other),
    }
}

/// Open or create the database at the given path.
///
/// Configures WAL mode, foreign keys, and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let conn = open_memory().expect("open in-memory db");
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("get user_version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_memory().expect("open");
        let fk: i32 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("get foreign_keys");
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_constraint_errors_mapped() {
        let conn = open_memory().expect("open");
        let err: DbError = conn
            .execute(
                "INSERT INTO aquariums (user_id, name, created_at) VALUES (999, 'ghost', 0)",
                [],
            )
            .map_err(DbError::from)
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)), "got {err:?}");
    }

    #[test]
    fn test_open_file_reopens() {
        let dir = std::env::temp_dir().join(format!("aqua-db-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("aquakeeper.db");
        {
            let conn = open(&path).expect("first open");
            queries::users::upsert(&conn, 42, Some("reef"), 1).expect("insert user");
        }
        let conn = open(&path).expect("second open");
        let user = queries::users::get_by_platform_id(&conn, 42).expect("user survives reopen");
        assert_eq!(user.username.as_deref(), Some("reef"));
        drop(conn);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
