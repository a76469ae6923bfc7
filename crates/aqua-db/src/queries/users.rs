//! User query functions.

use aqua_types::{PlatformUserId, RowId, User};
use rusqlite::{Connection, Row};

use crate::{not_found, DbError, Result};

/// Register a platform user, or refresh the username of a known one.
///
/// Returns the stored row. An existing username is kept when `username`
/// is `None`.
pub fn upsert(
    conn: &Connection,
    platform_user_id: PlatformUserId,
    username: Option<&str>,
    created_at: u64,
) -> Result<User> {
    conn.execute(
        "INSERT INTO users (platform_user_id, username, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(platform_user_id)
         DO UPDATE SET username = COALESCE(excluded.username, users.username)",
        rusqlite::params![platform_user_id, username, created_at as i64],
    )?;
    get_by_platform_id(conn, platform_user_id)
}

/// Get a user by row id.
pub fn get(conn: &Connection, id: RowId) -> Result<User> {
    conn.query_row(
        "SELECT id, platform_user_id, username, created_at FROM users WHERE id = ?1",
        [id],
        from_row,
    )
    .map_err(not_found(format!("user {id}")))
}

/// Get a user by platform id.
pub fn get_by_platform_id(conn: &Connection, platform_user_id: PlatformUserId) -> Result<User> {
    conn.query_row(
        "SELECT id, platform_user_id, username, created_at FROM users WHERE platform_user_id = ?1",
        [platform_user_id],
        from_row,
    )
    .map_err(not_found(format!("platform user {platform_user_id}")))
}

/// Delete a user together with everything they own.
pub fn delete(conn: &Connection, id: RowId) -> Result<()> {
    let removed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(DbError::NotFound(format!("user {id}")));
    }
    tracing::debug!(user_id = id, "user deleted");
    Ok(())
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        platform_user_id: row.get(1)?,
        username: row.get(2)?,
        created_at: row.get::<_, i64>(3)? as u64,
    })
}
