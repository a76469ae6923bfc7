//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are forward-only.

use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Settings written on first start.
pub const DEFAULT_SETTINGS: [(&str, &str); 3] = [
    ("nh3_warning_mg_l", "0.05"),
    ("default_change_volume_pct", "25"),
    ("default_change_period_days", "7"),
];

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<()> {
    let current_version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if current_version == 0 {
        tracing::info!("Initializing database schema v{SCHEMA_VERSION}");
        conn.execute_batch(schema::SCHEMA_V1)?;
        insert_default_settings(conn)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        for version in (current_version + 1)..=SCHEMA_VERSION {
            tracing::info!("Running migration to v{version}");
            run_migration(conn, version)?;
            conn.pragma_update(None, "user_version", version)?;
        }
    } else if current_version > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "Database version {current_version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    Ok(())
}

fn insert_default_settings(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)")?;

    for (key, value) in &DEFAULT_SETTINGS {
        stmt.execute(rusqlite::params![key, value])?;
    }

    Ok(())
}

fn run_migration(_conn: &Connection, version: u32) -> Result<()> {
    match version {
        // 2 => migration_v2(conn),
        _ => Err(DbError::Migration(format!(
            "Unknown migration version: {version}"
        ))),
    }
}
