//! Inhabitant (fish / plant) query functions.

use aqua_types::{Inhabitant, InhabitantKind, RowId};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};

use crate::{not_found, DbError, Result};

const COLUMNS: &str = "id, aquarium_id, kind, species, quantity, added_at";

/// Add a group of fish or plants to an aquarium.
///
/// `quantity` must lie in `1..=u32::MAX`; the schema rejects anything
/// else with [`DbError::Constraint`].
pub fn insert(
    conn: &Connection,
    aquarium_id: RowId,
    kind: InhabitantKind,
    species: &str,
    quantity: i64,
    added_at: u64,
) -> Result<RowId> {
    conn.execute(
        "INSERT INTO inhabitants (aquarium_id, kind, species, quantity, added_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![aquarium_id, kind.as_str(), species, quantity, added_at as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get an inhabitant row by id.
pub fn get(conn: &Connection, id: RowId) -> Result<Inhabitant> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM inhabitants WHERE id = ?1"),
        [id],
        from_row,
    )
    .map_err(not_found(format!("inhabitant {id}")))
}

/// List an aquarium's inhabitants, fish first, then by species.
pub fn list(conn: &Connection, aquarium_id: RowId) -> Result<Vec<Inhabitant>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM inhabitants WHERE aquarium_id = ?1 ORDER BY kind, species"
    ))?;

    let rows = stmt
        .query_map([aquarium_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Change how many individuals a row counts.
pub fn set_quantity(conn: &Connection, id: RowId, quantity: i64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE inhabitants SET quantity = ?1 WHERE id = ?2",
        rusqlite::params![quantity, id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("inhabitant {id}")));
    }
    Ok(())
}

/// Remove an inhabitant row.
pub fn remove(conn: &Connection, id: RowId) -> Result<()> {
    let removed = conn.execute("DELETE FROM inhabitants WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(DbError::NotFound(format!("inhabitant {id}")));
    }
    Ok(())
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Inhabitant> {
    let kind: String = row.get(2)?;
    let kind = kind
        .parse::<InhabitantKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Inhabitant {
        id: row.get(0)?,
        aquarium_id: row.get(1)?,
        kind,
        species: row.get(3)?,
        quantity: row.get(4)?,
        added_at: row.get::<_, i64>(5)? as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{aquariums, users};

    fn test_db() -> (Connection, RowId) {
        let conn = crate::open_memory().expect("open test db");
        let user = users::upsert(&conn, 1, None, 100).expect("user");
        let aq = aquariums::insert(&conn, user.id, "Planted", None, Some(60.0), 100)
            .expect("aquarium");
        (conn, aq)
    }

    #[test]
    fn test_insert_and_list() {
        let (conn, aq) = test_db();
        insert(&conn, aq, InhabitantKind::Plant, "Anubias nana", 3, 1000).expect("plant");
        insert(&conn, aq, InhabitantKind::Fish, "Neon tetra", 12, 1000).expect("fish");

        let rows = list(&conn, aq).expect("list");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, InhabitantKind::Fish);
        assert_eq!(rows[0].quantity, 12);
        assert_eq!(rows[1].species, "Anubias nana");
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let (conn, aq) = test_db();
        let err = insert(&conn, aq, InhabitantKind::Fish, "Guppy", 0, 1).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
        let err = insert(&conn, aq, InhabitantKind::Fish, "Guppy", -4, 1).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
        assert!(list(&conn, aq).expect("list").is_empty());
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let (conn, aq) = test_db();
        let err = insert(&conn, aq, InhabitantKind::Fish, "Guppy", 5_000_000_000, 1).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));

        let max = i64::from(u32::MAX);
        let id = insert(&conn, aq, InhabitantKind::Fish, "Guppy", max, 1).expect("u32::MAX fits");
        let err = set_quantity(&conn, id, max + 1).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));

        let rows = list(&conn, aq).expect("list still readable");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, u32::MAX);
    }

    #[test]
    fn test_missing_aquarium_rejected() {
        let (conn, _) = test_db();
        let err = insert(&conn, 9999, InhabitantKind::Fish, "Guppy", 1, 1).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_set_quantity() {
        let (conn, aq) = test_db();
        let id = insert(&conn, aq, InhabitantKind::Fish, "Guppy", 5, 1).expect("insert");
        set_quantity(&conn, id, 8).expect("update");
        assert_eq!(get(&conn, id).expect("get").quantity, 8);

        let err = set_quantity(&conn, id, 0).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
        assert_eq!(get(&conn, id).expect("get").quantity, 8);
    }

    #[test]
    fn test_remove() {
        let (conn, aq) = test_db();
        let id = insert(&conn, aq, InhabitantKind::Fish, "Guppy", 5, 1).expect("insert");
        remove(&conn, id).expect("remove");
        assert!(matches!(get(&conn, id), Err(DbError::NotFound(_))));
    }
}
