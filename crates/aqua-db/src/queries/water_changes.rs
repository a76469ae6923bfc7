//! Water-change log query functions.

use aqua_types::{RowId, WaterChange};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::Result;

/// Log a water change and return its id.
pub fn record(
    conn: &Connection,
    aquarium_id: RowId,
    changed_at: u64,
    volume_pct: f64,
) -> Result<RowId> {
    conn.execute(
        "INSERT INTO water_changes (aquarium_id, changed_at, volume_pct) VALUES (?1, ?2, ?3)",
        rusqlite::params![aquarium_id, changed_at as i64, volume_pct],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent water change.
pub fn last(conn: &Connection, aquarium_id: RowId) -> Result<Option<WaterChange>> {
    let change = conn
        .query_row(
            "SELECT id, aquarium_id, changed_at, volume_pct FROM water_changes
             WHERE aquarium_id = ?1 ORDER BY changed_at DESC, id DESC LIMIT 1",
            [aquarium_id],
            from_row,
        )
        .optional()?;
    Ok(change)
}

/// Newest-first log, at most `limit` entries.
pub fn list(conn: &Connection, aquarium_id: RowId, limit: u32) -> Result<Vec<WaterChange>> {
    let mut stmt = conn.prepare(
        "SELECT id, aquarium_id, changed_at, volume_pct FROM water_changes
         WHERE aquarium_id = ?1 ORDER BY changed_at DESC, id DESC LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![aquarium_id, limit], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<WaterChange> {
    Ok(WaterChange {
        id: row.get(0)?,
        aquarium_id: row.get(1)?,
        changed_at: row.get::<_, i64>(2)? as u64,
        volume_pct: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{aquariums, users};
    use crate::DbError;

    fn test_db() -> (Connection, RowId) {
        let conn = crate::open_memory().expect("open test db");
        let user = users::upsert(&conn, 1, None, 100).expect("user");
        let aq = aquariums::insert(&conn, user.id, "Tank", None, None, 100).expect("aquarium");
        (conn, aq)
    }

    #[test]
    fn test_record_and_last() {
        let (conn, aq) = test_db();
        assert!(last(&conn, aq).expect("last").is_none());

        record(&conn, aq, 2000, 30.0).expect("record");
        record(&conn, aq, 1000, 50.0).expect("record");

        let latest = last(&conn, aq).expect("last").expect("some");
        assert_eq!(latest.changed_at, 2000);
        assert_eq!(latest.volume_pct, 30.0);

        let log = list(&conn, aq, 10).expect("list");
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].changed_at, 1000);
    }

    #[test]
    fn test_invalid_volume_rejected() {
        let (conn, aq) = test_db();
        assert!(matches!(
            record(&conn, aq, 1, 0.0),
            Err(DbError::Constraint(_))
        ));
    }
}
