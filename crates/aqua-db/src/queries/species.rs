//! Species catalog query functions.

use aqua_types::{InhabitantKind, RowId, Species, ToleranceRange};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};

use crate::{not_found, Result};

const COLUMNS: &str = "id, name, kind, ph_min, ph_max, temp_min_c, temp_max_c, kh_min, kh_max, \
                       gh_min, gh_max, no3_max, nh3_max_mg_l";

/// Insert a catalog entry or overwrite the one with the same name.
///
/// The `id` of `species` is ignored; the stored id is returned.
pub fn upsert(conn: &Connection, species: &Species) -> Result<RowId> {
    conn.execute(
        "INSERT INTO species (name, kind, ph_min, ph_max, temp_min_c, temp_max_c, kh_min, kh_max,
                              gh_min, gh_max, no3_max, nh3_max_mg_l)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(name) DO UPDATE SET
             kind = excluded.kind,
             ph_min = excluded.ph_min,
             ph_max = excluded.ph_max,
             temp_min_c = excluded.temp_min_c,
             temp_max_c = excluded.temp_max_c,
             kh_min = excluded.kh_min,
             kh_max = excluded.kh_max,
             gh_min = excluded.gh_min,
             gh_max = excluded.gh_max,
             no3_max = excluded.no3_max,
             nh3_max_mg_l = excluded.nh3_max_mg_l",
        rusqlite::params![
            species.name,
            species.kind.as_str(),
            species.ph.min,
            species.ph.max,
            species.temp_c.min,
            species.temp_c.max,
            species.kh.min,
            species.kh.max,
            species.gh.min,
            species.gh.max,
            species.no3_max,
            species.nh3_max_mg_l,
        ],
    )?;

    let id = conn.query_row(
        "SELECT id FROM species WHERE name = ?1",
        [&species.name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Look up a catalog entry by exact name.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<Species> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM species WHERE name = ?1"),
        [name],
        from_row,
    )
    .map_err(not_found(format!("species '{name}'")))
}

/// Full catalog by name.
pub fn list(conn: &Connection) -> Result<Vec<Species>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM species ORDER BY name"))?;

    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Catalog entries for the species living in an aquarium.
///
/// Names are matched case-insensitively; inhabitants without a catalog
/// entry are skipped.
pub fn for_aquarium(conn: &Connection, aquarium_id: RowId) -> Result<Vec<Species>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM species
         WHERE lower(name) IN (SELECT lower(species) FROM inhabitants WHERE aquarium_id = ?1)
         ORDER BY name"
    ))?;

    let rows = stmt
        .query_map([aquarium_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Species> {
    let kind: String = row.get(2)?;
    let kind = kind
        .parse::<InhabitantKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Species {
        id: row.get(0)?,
        name: row.get(1)?,
        kind,
        ph: ToleranceRange::new(row.get(3)?, row.get(4)?),
        temp_c: ToleranceRange::new(row.get(5)?, row.get(6)?),
        kh: ToleranceRange::new(row.get(7)?, row.get(8)?),
        gh: ToleranceRange::new(row.get(9)?, row.get(10)?),
        no3_max: row.get(11)?,
        nh3_max_mg_l: row.get(12)?,
    })
}
