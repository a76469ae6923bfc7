//! Chemistry command handlers.

use std::sync::Arc;

use aqua_chem::ammonia::{self, AmmoniaInput};
use aqua_chem::tolerance;
use aqua_db::queries::{aquariums, measurements, settings, species};
use aqua_types::Species;
use serde_json::Value;

use super::{db_error, parse_params, require_i64, to_json};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Un-ionized ammonia for ad-hoc readings, without storing anything.
pub async fn calc_ammonia(state: &Arc<DaemonState>, params: &Value) -> Result {
    let input: AmmoniaInput = parse_params(params)?;
    let reading =
        ammonia::calculate(&input).map_err(|e| RpcError::invalid_input(&e.to_string()))?;

    let db = state.db.lock().await;
    let threshold = settings::get_f64(
        &db,
        "nh3_warning_mg_l",
        state.config.chemistry.nh3_warning_mg_l,
    )
    .map_err(db_error)?;

    let mut result = to_json(&reading)?;
    result["toxicity"] = to_json(&ammonia::classify(reading.nh3_mg_l, threshold))?;
    result["threshold_mg_l"] = serde_json::json!(threshold);
    Ok(result)
}

/// Check the latest water test against every catalogued species in the tank.
pub async fn check_species_tolerance(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;

    let db = state.db.lock().await;
    aquariums::get(&db, aquarium_id).map_err(db_error)?;
    let Some(latest) = measurements::latest(&db, aquarium_id).map_err(db_error)? else {
        return Ok(serde_json::json!({
            "measurement_id": null,
            "deviations": [],
        }));
    };
    let present = species::for_aquarium(&db, aquarium_id).map_err(db_error)?;
    let deviations = tolerance::check_all(&latest, &present);

    Ok(serde_json::json!({
        "measurement_id": latest.id,
        "species_checked": present.len(),
        "deviations": to_json(&deviations)?,
    }))
}

/// Add or replace a species catalog entry.
pub async fn upsert_species(state: &Arc<DaemonState>, params: &Value) -> Result {
    let entry: Species = parse_params(params)?;
    if entry.name.trim().is_empty() {
        return Err(RpcError::invalid_params("name must not be empty"));
    }

    let db = state.db.lock().await;
    let id = species::upsert(&db, &entry).map_err(db_error)?;
    let stored = species::get_by_name(&db, &entry.name).map_err(db_error)?;
    tracing::debug!(species_id = id, name = %stored.name, "species catalog updated");
    to_json(&stored)
}

/// Full species catalog.
pub async fn list_species(state: &Arc<DaemonState>) -> Result {
    let db = state.db.lock().await;
    let catalog = species::list(&db).map_err(db_error)?;
    to_json(&catalog)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::commands::aquariums::{add_inhabitant, create_aquarium};
    use crate::commands::diagnostics::set_setting;
    use crate::commands::measurements::record_measurement;
    use crate::commands::test_state;
    use crate::commands::users::register_user;

    #[tokio::test]
    async fn test_calc_ammonia() {
        let state = test_state();
        let result = calc_ammonia(&state, &json!({"ph": 7.0, "temp_c": 25.0, "tan_mg_l": 1.0}))
            .await
            .expect("calc");
        assert!(result["fraction"].as_f64().expect("fraction") < 0.01);
        assert_eq!(result["toxicity"], "safe");
        assert_eq!(result["threshold_mg_l"], 0.05);
    }

    #[tokio::test]
    async fn test_calc_ammonia_threshold_from_settings() {
        let state = test_state();
        set_setting(&state, &json!({"key": "nh3_warning_mg_l", "value": "0.001"}))
            .await
            .expect("set");
        let result = calc_ammonia(&state, &json!({"ph": 7.0, "temp_c": 25.0, "tan_mg_l": 1.0}))
            .await
            .expect("calc");
        assert_eq!(result["toxicity"], "toxic");
    }

    #[tokio::test]
    async fn test_calc_ammonia_rejections() {
        let state = test_state();
        let err = calc_ammonia(&state, &json!({"ph": 15.0, "temp_c": 25.0, "tan_mg_l": 1.0}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32022);

        let err = calc_ammonia(&state, &json!({"ph": 7.0})).await.unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn test_species_tolerance() {
        let state = test_state();
        upsert_species(
            &state,
            &json!({
                "name": "Neon tetra",
                "kind": "fish",
                "ph": {"min": 5.0, "max": 7.0},
                "temp_c": {"min": 20.0, "max": 26.0},
                "no3_max": 20.0
            }),
        )
        .await
        .expect("species");

        let user = register_user(&state, &json!({"platform_user_id": 8}))
            .await
            .expect("register");
        let tank = create_aquarium(&state, &json!({"user_id": user["id"], "name": "Tank"}))
            .await
            .expect("create");

        let empty = check_species_tolerance(&state, &json!({"aquarium_id": tank["id"]}))
            .await
            .expect("check");
        assert!(empty["measurement_id"].is_null());

        add_inhabitant(
            &state,
            &json!({"aquarium_id": tank["id"], "kind": "fish", "species": "Neon tetra", "quantity": 10}),
        )
        .await
        .expect("add");
        record_measurement(
            &state,
            &json!({"aquarium_id": tank["id"], "ph": 7.6, "temp_c": 24.0, "no3": 5.0}),
        )
        .await
        .expect("record");

        let result = check_species_tolerance(&state, &json!({"aquarium_id": tank["id"]}))
            .await
            .expect("check");
        assert_eq!(result["species_checked"], 1);
        let deviations = result["deviations"].as_array().expect("array");
        assert_eq!(deviations.len(), 1);
        assert_eq!(deviations[0]["param"], "ph");
        assert_eq!(deviations[0]["direction"], "too_high");

        let catalog = list_species(&state).await.expect("list");
        assert_eq!(catalog.as_array().expect("array").len(), 1);
    }
}
