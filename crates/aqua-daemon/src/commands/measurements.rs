//! Water test command handlers.

use std::sync::Arc;

use aqua_chem::ammonia::{self, ToxicityLevel};
use aqua_db::queries::{aquariums, measurements, settings};
use aqua_db::queries::measurements::NewMeasurement;
use aqua_types::{WaterParam, WaterReadings};
use serde_json::Value;

use super::{db_error, now_secs, optional_u64, parse_params, require_i64, require_str, to_json};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Default page size for `list_measurements`.
const DEFAULT_LIST_LIMIT: u32 = 20;

/// Store a water test. Adds a `warning` when NH3 exceeds the configured level.
pub async fn record_measurement(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let readings: WaterReadings = parse_params(params)?;
    if readings.is_empty() {
        return Err(RpcError::invalid_params("at least one reading required"));
    }
    let measured_at = optional_u64(params, "measured_at")?.unwrap_or_else(now_secs);
    let notes = params
        .get("notes")
        .and_then(Value::as_str)
        .map(str::to_string);

    let db = state.db.lock().await;
    let stored = measurements::insert(
        &db,
        &NewMeasurement {
            aquarium_id,
            measured_at,
            readings,
            notes,
        },
    )
    .map_err(db_error)?;

    let threshold = settings::get_f64(
        &db,
        "nh3_warning_mg_l",
        state.config.chemistry.nh3_warning_mg_l,
    )
    .map_err(db_error)?;

    let mut result = to_json(&stored)?;
    if let Some(nh3) = stored.nh3_mg_l {
        if ammonia::classify(nh3, threshold) == ToxicityLevel::Toxic {
            tracing::warn!(
                aquarium_id,
                nh3_mg_l = nh3,
                threshold,
                "un-ionized ammonia above warning level"
            );
            result["warning"] = serde_json::json!(format!(
                "un-ionized NH3 {nh3:.4} mg/L exceeds {threshold} mg/L, toxicity possible"
            ));
        }
    }
    Ok(result)
}

/// Newest-first water tests of an aquarium.
pub async fn list_measurements(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let max = state.config.chemistry.max_list_rows;
    let limit = optional_u64(params, "limit")?
        .map_or(DEFAULT_LIST_LIMIT, |l| u32::try_from(l).unwrap_or(max))
        .min(max);

    let db = state.db.lock().await;
    aquariums::get(&db, aquarium_id).map_err(db_error)?;
    let rows = measurements::list(&db, aquarium_id, limit).map_err(db_error)?;
    to_json(&rows)
}

/// Oldest-first `[measured_at, value]` pairs of one parameter, for charting.
pub async fn get_param_series(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let param: WaterParam = require_str(params, "param")?
        .parse()
        .map_err(|e: aqua_types::TypesError| RpcError::invalid_params(&e.to_string()))?;

    let db = state.db.lock().await;
    aquariums::get(&db, aquarium_id).map_err(db_error)?;
    let points = measurements::series(&db, aquarium_id, param).map_err(db_error)?;

    Ok(serde_json::json!({
        "aquarium_id": aquarium_id,
        "param": param,
        "points": points,
    }))
}

/// Delete a water test.
pub async fn delete_measurement(state: &Arc<DaemonState>, params: &Value) -> Result {
    let measurement_id = require_i64(params, "measurement_id")?;
    let db = state.db.lock().await;
    measurements::delete(&db, measurement_id).map_err(db_error)?;
    Ok(serde_json::json!({"deleted": true}))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::commands::aquariums::create_aquarium;
    use crate::commands::test_state;
    use crate::commands::users::register_user;

    async fn tank(state: &Arc<DaemonState>) -> Value {
        let user = register_user(state, &json!({"platform_user_id": 3}))
            .await
            .expect("register");
        create_aquarium(state, &json!({"user_id": user["id"], "name": "Tank"}))
            .await
            .expect("create")
    }

    #[tokio::test]
    async fn test_record_safe_measurement() {
        let state = test_state();
        let tank = tank(&state).await;
        let m = record_measurement(
            &state,
            &json!({"aquarium_id": tank["id"], "ph": 7.0, "temp_c": 25.0, "tan_mg_l": 1.0,
                    "no3": 10, "measured_at": 1000}),
        )
        .await
        .expect("record");
        assert_eq!(m["measured_at"], 1000);
        assert!(m["nh3_fraction"].as_f64().expect("fraction") < 0.01);
        assert!(m.get("warning").is_none());
    }

    #[tokio::test]
    async fn test_record_toxic_measurement_warns() {
        let state = test_state();
        let tank = tank(&state).await;
        let m = record_measurement(
            &state,
            &json!({"aquarium_id": tank["id"], "ph": 8.4, "temp_c": 28.0, "tan_mg_l": 2.0}),
        )
        .await
        .expect("record");
        assert!(m["nh3_mg_l"].as_f64().expect("nh3") > 0.05);
        assert!(m["warning"].as_str().expect("warning").contains("NH3"));
    }

    #[tokio::test]
    async fn test_record_rejections() {
        let state = test_state();
        let tank = tank(&state).await;

        let err = record_measurement(&state, &json!({"aquarium_id": tank["id"]}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);

        let err = record_measurement(
            &state,
            &json!({"aquarium_id": tank["id"], "ph": 7.0, "temp_c": 80.0, "tan_mg_l": 1.0}),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, -32022);

        let err = record_measurement(&state, &json!({"aquarium_id": 999, "ph": 7.0}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32009);

        let err = record_measurement(&state, &json!({"aquarium_id": tank["id"], "ph": "seven"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn test_series_and_list() {
        let state = test_state();
        let tank = tank(&state).await;
        for (t, no3) in [(3000, 30.0), (1000, 10.0), (2000, 20.0)] {
            record_measurement(
                &state,
                &json!({"aquarium_id": tank["id"], "no3": no3, "measured_at": t}),
            )
            .await
            .expect("record");
        }

        let series = get_param_series(&state, &json!({"aquarium_id": tank["id"], "param": "no3"}))
            .await
            .expect("series");
        assert_eq!(series["param"], "no3");
        assert_eq!(series["points"], json!([[1000, 10.0], [2000, 20.0], [3000, 30.0]]));

        let err = get_param_series(&state, &json!({"aquarium_id": tank["id"], "param": "salt"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);

        let recent = list_measurements(&state, &json!({"aquarium_id": tank["id"], "limit": 2}))
            .await
            .expect("list");
        let recent = recent.as_array().expect("array");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0]["measured_at"], 3000);
    }
}
