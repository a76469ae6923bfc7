//! Water test query functions.
//!
//! The derived ammonia columns are filled on insert whenever pH,
//! temperature and TAN are all present.

use aqua_chem::ammonia::{self, AmmoniaInput, AmmoniaReading};
use aqua_types::{Measurement, RowId, WaterParam, WaterReadings};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::{not_found, DbError, Result};

const COLUMNS: &str = "id, aquarium_id, measured_at, ph, kh, gh, no2, no3, tan_mg_l, po4, temp_c, \
                       nh3_fraction, nh3_mg_l, notes";

/// A water test about to be stored.
#[derive(Clone, Debug, Default)]
pub struct NewMeasurement {
    pub aquarium_id: RowId,
    pub measured_at: u64,
    pub readings: WaterReadings,
    pub notes: Option<String>,
}

/// Ammonia figures for a set of readings, if enough were taken.
///
/// # Errors
///
/// Propagates [`aqua_chem::ChemError`] when the readings are present but
/// physically implausible.
pub fn derive_ammonia(readings: &WaterReadings) -> Result<Option<AmmoniaReading>> {
    match (readings.ph, readings.temp_c, readings.tan_mg_l) {
        (Some(ph), Some(temp_c), Some(tan_mg_l)) => {
            let reading = ammonia::calculate(&AmmoniaInput {
                ph,
                temp_c,
                tan_mg_l,
            })?;
            Ok(Some(reading))
        }
        _ => Ok(None),
    }
}

/// Store a water test and return the stored row.
pub fn insert(conn: &Connection, new: &NewMeasurement) -> Result<Measurement> {
    let nh3 = derive_ammonia(&new.readings)?;
    let r = &new.readings;

    conn.execute(
        "INSERT INTO measurements (aquarium_id, measured_at, ph, kh, gh, no2, no3, tan_mg_l, po4,
                                   temp_c, nh3_fraction, nh3_mg_l, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        rusqlite::params![
            new.aquarium_id,
            new.measured_at as i64,
            r.ph,
            r.kh,
            r.gh,
            r.no2,
            r.no3,
            r.tan_mg_l,
            r.po4,
            r.temp_c,
            nh3.map(|n| n.fraction),
            nh3.map(|n| n.nh3_mg_l),
            new.notes,
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!(
        measurement_id = id,
        aquarium_id = new.aquarium_id,
        nh3_mg_l = nh3.map(|n| n.nh3_mg_l),
        "measurement stored"
    );
    get(conn, id)
}

/// Get a measurement by id.
pub fn get(conn: &Connection, id: RowId) -> Result<Measurement> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM measurements WHERE id = ?1"),
        [id],
        from_row,
    )
    .map_err(not_found(format!("measurement {id}")))
}

/// Most recent measurement of an aquarium.
pub fn latest(conn: &Connection, aquarium_id: RowId) -> Result<Option<Measurement>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM measurements WHERE aquarium_id = ?1
                 ORDER BY measured_at DESC, id DESC LIMIT 1"
            ),
            [aquarium_id],
            from_row,
        )
        .optional()?;
    Ok(row)
}

/// Newest-first measurements of an aquarium, at most `limit`.
pub fn list(conn: &Connection, aquarium_id: RowId, limit: u32) -> Result<Vec<Measurement>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM measurements WHERE aquarium_id = ?1
         ORDER BY measured_at DESC, id DESC LIMIT ?2"
    ))?;

    let rows = stmt
        .query_map(rusqlite::params![aquarium_id, limit], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Oldest-first `(measured_at, value)` points of one parameter.
///
/// Tests that did not cover the parameter are skipped.
pub fn series(conn: &Connection, aquarium_id: RowId, param: WaterParam) -> Result<Vec<(u64, f64)>> {
    let column = param.column();
    let mut stmt = conn.prepare(&format!(
        "SELECT measured_at, {column} FROM measurements
         WHERE aquarium_id = ?1 AND {column} IS NOT NULL
         ORDER BY measured_at, id"
    ))?;

    let points = stmt
        .query_map([aquarium_id], |row| {
            Ok((row.get::<_, i64>(0)? as u64, row.get::<_, f64>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(points)
}

/// Delete a measurement.
pub fn delete(conn: &Connection, id: RowId) -> Result<()> {
    let removed = conn.execute("DELETE FROM measurements WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(DbError::NotFound(format!("measurement {id}")));
    }
    Ok(())
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Measurement> {
    Ok(Measurement {
        id: row.get(0)?,
        aquarium_id: row.get(1)?,
        measured_at: row.get::<_, i64>(2)? as u64,
        readings: WaterReadings {
            ph: row.get(3)?,
            kh: row.get(4)?,
            gh: row.get(5)?,
            no2: row.get(6)?,
            no3: row.get(7)?,
            tan_mg_l: row.get(8)?,
            po4: row.get(9)?,
            temp_c: row.get(10)?,
        },
        nh3_fraction: row.get(11)?,
        nh3_mg_l: row.get(12)?,
        notes: row.get(13)?,
    })
}
