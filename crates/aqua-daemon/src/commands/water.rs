//! Water-change command handlers.

use std::sync::Arc;

use aqua_chem::schedule;
use aqua_db::queries::{aquariums, measurements, settings, water_changes, water_settings};
use aqua_types::{WaterChangeSettings, WaterParam};
use rusqlite::Connection;
use serde_json::Value;

use super::{db_error, now_secs, optional_f64, optional_u64, require_i64, to_json};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Set how much water is changed and how often.
pub async fn set_water_change_settings(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let pct = optional_f64(params, "change_volume_pct")?
        .ok_or_else(|| RpcError::invalid_params("change_volume_pct required"))?;
    let period_days = optional_u64(params, "period_days")?
        .ok_or_else(|| RpcError::invalid_params("period_days required"))?;
    let period_days = u32::try_from(period_days)
        .map_err(|_| RpcError::invalid_params("period_days out of range"))?;

    let db = state.db.lock().await;
    water_settings::upsert(&db, aquarium_id, pct, period_days, now_secs()).map_err(db_error)?;
    let stored = effective_settings(&db, aquarium_id)?;
    to_json(&stored)
}

/// The aquarium's routine, or the defaults when none was configured.
pub async fn get_water_change_settings(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let db = state.db.lock().await;
    aquariums::get(&db, aquarium_id).map_err(db_error)?;
    let current = effective_settings(&db, aquarium_id)?;
    to_json(&current)
}

/// Log a water change. Volume defaults to the configured routine.
pub async fn log_water_change(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let changed_at = optional_u64(params, "changed_at")?.unwrap_or_else(now_secs);

    let db = state.db.lock().await;
    let volume_pct = match optional_f64(params, "volume_pct")? {
        Some(pct) => pct,
        None => effective_settings(&db, aquarium_id)?.change_volume_pct,
    };
    let id = water_changes::record(&db, aquarium_id, changed_at, volume_pct).map_err(db_error)?;
    tracing::info!(aquarium_id, volume_pct, "water change logged");

    Ok(serde_json::json!({
        "id": id,
        "aquarium_id": aquarium_id,
        "changed_at": changed_at,
        "volume_pct": volume_pct,
    }))
}

/// Newest-first water-change log.
pub async fn list_water_changes(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let max = state.config.chemistry.max_list_rows;
    let limit = optional_u64(params, "limit")?
        .map_or(max, |l| u32::try_from(l).unwrap_or(max))
        .min(max);

    let db = state.db.lock().await;
    aquariums::get(&db, aquarium_id).map_err(db_error)?;
    let log = water_changes::list(&db, aquarium_id, limit).map_err(db_error)?;
    to_json(&log)
}

/// When the next change is due, and the nitrate level it should leave.
pub async fn get_water_change_status(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let now = optional_u64(params, "now")?.unwrap_or_else(now_secs);

    let db = state.db.lock().await;
    aquariums::get(&db, aquarium_id).map_err(db_error)?;
    let routine = effective_settings(&db, aquarium_id)?;
    let last = water_changes::last(&db, aquarium_id).map_err(db_error)?;
    let status = schedule::status(&routine, last.as_ref(), now);

    let latest_no3 = measurements::series(&db, aquarium_id, WaterParam::No3)
        .map_err(db_error)?
        .last()
        .map(|&(_, no3)| no3);
    let no3_after_change = latest_no3
        .map(|no3| schedule::dilute(no3, routine.change_volume_pct))
        .transpose()
        .map_err(|e| RpcError::invalid_input(&e.to_string()))?;

    let mut result = to_json(&status)?;
    result["settings"] = to_json(&routine)?;
    result["no3_after_change"] = serde_json::json!(no3_after_change);
    Ok(result)
}

/// Stored routine, falling back to the database-wide defaults.
fn effective_settings(
    conn: &Connection,
    aquarium_id: i64,
) -> std::result::Result<WaterChangeSettings, RpcError> {
    if let Some(stored) = water_settings::get(conn, aquarium_id).map_err(db_error)? {
        return Ok(stored);
    }

    let pct = settings::get_f64(conn, "default_change_volume_pct", 25.0).map_err(db_error)?;
    if !is_change_volume(pct) {
        return Err(RpcError::internal_error("default_change_volume_pct out of range"));
    }
    let period = settings::get_f64(conn, "default_change_period_days", 7.0).map_err(db_error)?;
    let period_days = whole_days(period)
        .ok_or_else(|| RpcError::internal_error("default_change_period_days out of range"))?;

    Ok(WaterChangeSettings {
        aquarium_id,
        change_volume_pct: pct,
        period_days,
        updated_at: 0,
    })
}

/// A changed share of the tank: above 0, at most 100 %.
pub(crate) fn is_change_volume(pct: f64) -> bool {
    pct > 0.0 && pct <= 100.0
}

/// A routine period: a whole number of days, at least one.
pub(crate) fn whole_days(period: f64) -> Option<u32> {
    if period.fract() == 0.0 && (1.0..=f64::from(u32::MAX)).contains(&period) {
        Some(period as u32)
    } else {
        None
    }
}
