//! Settings query functions.

use rusqlite::Connection;

use crate::{not_found, DbError, Result};

/// Get a setting value by key.
pub fn get(conn: &Connection, key: &str) -> Result<String> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .map_err(not_found(format!("setting '{key}'")))
}

/// Set a setting value.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

/// Get a setting as f64, defaulting to `default` if not found.
pub fn get_f64(conn: &Connection, key: &str, default: f64) -> Result<f64> {
    match get(conn, key) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|e: std::num::ParseFloatError| DbError::Serialization(format!("{key}: {e}"))),
        Err(DbError::NotFound(_)) => Ok(default),
        Err(e) => Err(e),
    }
}
