//! Water-change settings query functions.

use aqua_types::{RowId, WaterChangeSettings};
use rusqlite::{Connection, OptionalExtension};

use crate::Result;

/// Create or replace the routine of an aquarium.
pub fn upsert(
    conn: &Connection,
    aquarium_id: RowId,
    change_volume_pct: f64,
    period_days: u32,
    updated_at: u64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO water_settings (aquarium_id, change_volume_pct, period_days, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(aquarium_id) DO UPDATE SET
             change_volume_pct = excluded.change_volume_pct,
             period_days = excluded.period_days,
             updated_at = excluded.updated_at",
        rusqlite::params![aquarium_id, change_volume_pct, period_days, updated_at as i64],
    )?;
    Ok(())
}

/// Routine of an aquarium, `None` if never configured.
pub fn get(conn: &Connection, aquarium_id: RowId) -> Result<Option<WaterChangeSettings>> {
    let settings = conn
        .query_row(
            "SELECT aquarium_id, change_volume_pct, period_days, updated_at
             FROM water_settings WHERE aquarium_id = ?1",
            [aquarium_id],
            |row| {
                Ok(WaterChangeSettings {
                    aquarium_id: row.get(0)?,
                    change_volume_pct: row.get(1)?,
                    period_days: row.get(2)?,
                    updated_at: row.get::<_, i64>(3)? as u64,
                })
            },
        )
        .optional()?;
    Ok(settings)
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
    fn test_upsert_replaces() {
        let (conn, aq) = test_db();
        assert!(get(&conn, aq).expect("get").is_none());

        upsert(&conn, aq, 30.0, 7, 1000).expect("insert");
        upsert(&conn, aq, 20.0, 3, 2000).expect("replace");

        let settings = get(&conn, aq).expect("get").expect("some");
        assert_eq!(settings.change_volume_pct, 20.0);
        assert_eq!(settings.period_days, 3);
        assert_eq!(settings.updated_at, 2000);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM water_settings", [], |r| r.get(0))
            .expect("count");
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let (conn, aq) = test_db();
        assert!(matches!(
            upsert(&conn, aq, 0.0, 7, 1),
            Err(DbError::Constraint(_))
        ));
        assert!(matches!(
            upsert(&conn, aq, 150.0, 7, 1),
            Err(DbError::Constraint(_))
        ));
        assert!(matches!(
            upsert(&conn, aq, 25.0, 0, 1),
            Err(DbError::Constraint(_))
        ));
    }
}
