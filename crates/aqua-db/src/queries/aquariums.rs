//! Aquarium query functions.

use aqua_types::{Aquarium, RowId};
use rusqlite::{Connection, Row};

use crate::{not_found, DbError, Result};

const COLUMNS: &str = "id, user_id, name, description, volume_l, created_at";

/// Insert a new aquarium and return its id.
pub fn insert(
    conn: &Connection,
    user_id: RowId,
    name: &str,
    description: Option<&str>,
    volume_l: Option<f64>,
    created_at: u64,
) -> Result<RowId> {
    conn.execute(
        "INSERT INTO aquariums (user_id, name, description, volume_l, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![user_id, name, description, volume_l, created_at as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get an aquarium by id.
pub fn get(conn: &Connection, id: RowId) -> Result<Aquarium> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM aquariums WHERE id = ?1"),
        [id],
        from_row,
    )
    .map_err(not_found(format!("aquarium {id}")))
}

/// List a user's aquariums by name.
pub fn list_for_user(conn: &Connection, user_id: RowId) -> Result<Vec<Aquarium>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM aquariums WHERE user_id = ?1 ORDER BY name"
    ))?;

    let rows = stmt
        .query_map([user_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Change the recorded tank volume.
pub fn update_volume(conn: &Connection, id: RowId, volume_l: Option<f64>) -> Result<()> {
    let updated = conn.execute(
        "UPDATE aquariums SET volume_l = ?1 WHERE id = ?2",
        rusqlite::params![volume_l, id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("aquarium {id}")));
    }
    Ok(())
}

/// Delete an aquarium and all of its child rows.
pub fn delete(conn: &Connection, id: RowId) -> Result<()> {
    let removed = conn.execute("DELETE FROM aquariums WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(DbError::NotFound(format!("aquarium {id}")));
    }
    Ok(())
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Aquarium> {
    Ok(Aquarium {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        volume_l: row.get(4)?,
        created_at: row.get::<_, i64>(5)? as u64,
    })
}
