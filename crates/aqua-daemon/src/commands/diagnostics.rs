//! Diagnostics & settings command handlers.

use std::sync::Arc;

use aqua_db::queries::settings;
use serde_json::Value;

use super::water::{is_change_volume, whole_days};
use super::{db_error, require_str};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Read one setting.
pub async fn get_setting(state: &Arc<DaemonState>, params: &Value) -> Result {
    let key = require_str(params, "key")?;
    let db = state.db.lock().await;
    let value = settings::get(&db, key).map_err(db_error)?;
    Ok(serde_json::json!({"key": key, "value": value}))
}

/// Write one setting.
pub async fn set_setting(state: &Arc<DaemonState>, params: &Value) -> Result {
    let key = require_str(params, "key")?;
    let value = match params.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => return Err(RpcError::invalid_params("value required")),
    };

    check_setting(key, &value)?;

    let db = state.db.lock().await;
    settings::set(&db, key, &value).map_err(db_error)?;
    tracing::info!(key, value = %value, "setting updated");
    Ok(serde_json::json!({"key": key, "value": value}))
}

/// Range check for the settings the daemon itself reads.
fn check_setting(key: &str, value: &str) -> std::result::Result<(), RpcError> {
    let number = value.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    let (valid, expected) = match key {
        "nh3_warning_mg_l" => (number.is_some_and(|v| v >= 0.0), "a number >= 0"),
        "default_change_volume_pct" => (number.is_some_and(is_change_volume), "a number in (0, 100]"),
        "default_change_period_days" => (number.and_then(whole_days).is_some(), "a whole number >= 1"),
        _ => return Ok(()),
    };

    if valid {
        Ok(())
    } else {
        Err(RpcError::invalid_params(&format!("{key} must be {expected}")))
    }
}

/// Export a diagnostics bundle.
pub async fn export_diagnostics(state: &Arc<DaemonState>) -> Result {
    let db = state.db.lock().await;
    let count = |table: &str| -> std::result::Result<i64, RpcError> {
        db.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .map_err(|e| RpcError::internal_error(&format!("db error: {e}")))
    };

    Ok(serde_json::json!({
        "diagnostics": {
            "version": env!("CARGO_PKG_VERSION"),
            "schema_version": aqua_db::SCHEMA_VERSION,
            "data_dir": state.config.data_dir(),
            "users": count("users")?,
            "aquariums": count("aquariums")?,
            "measurements": count("measurements")?,
            "species": count("species")?,
        }
    }))
}

/// Ask the daemon to stop.
pub async fn shutdown(state: &Arc<DaemonState>) -> Result {
    // No receiver means the daemon is already stopping.
    let _ = state.shutdown_tx.send(());
    Ok(serde_json::json!({"stopping": true}))
}
