//! Aquarium & inhabitant command handlers.

use std::sync::Arc;

use aqua_db::queries::{aquariums, inhabitants, users};
use aqua_types::InhabitantKind;
use serde_json::Value;

use super::{db_error, now_secs, optional_f64, require_i64, require_str, to_json};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Create an aquarium for a user.
pub async fn create_aquarium(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = require_i64(params, "user_id")?;
    let name = require_str(params, "name")?.trim();
    if name.is_empty() {
        return Err(RpcError::invalid_params("name must not be empty"));
    }
    let description = params.get("description").and_then(Value::as_str);
    let volume_l = optional_f64(params, "volume_l")?;

    let db = state.db.lock().await;
    let id = aquariums::insert(&db, user_id, name, description, volume_l, now_secs())
        .map_err(db_error)?;
    let aquarium = aquariums::get(&db, id).map_err(db_error)?;
    tracing::info!(aquarium_id = id, user_id, "aquarium created");
    to_json(&aquarium)
}

/// List a user's aquariums.
pub async fn list_aquariums(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = require_i64(params, "user_id")?;
    let db = state.db.lock().await;
    // Distinguish "no tanks" from "no such user".
    users::get(&db, user_id).map_err(db_error)?;
    let tanks = aquariums::list_for_user(&db, user_id).map_err(db_error)?;
    to_json(&tanks)
}

/// Get one aquarium.
pub async fn get_aquarium(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let db = state.db.lock().await;
    let aquarium = aquariums::get(&db, aquarium_id).map_err(db_error)?;
    to_json(&aquarium)
}

/// Change or clear the volume of an aquarium.
pub async fn set_aquarium_volume(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let volume_l = optional_f64(params, "volume_l")?;
    let db = state.db.lock().await;
    aquariums::update_volume(&db, aquarium_id, volume_l).map_err(db_error)?;
    let aquarium = aquariums::get(&db, aquarium_id).map_err(db_error)?;
    to_json(&aquarium)
}

/// Delete an aquarium with all its measurements, inhabitants and settings.
pub async fn delete_aquarium(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let db = state.db.lock().await;
    aquariums::delete(&db, aquarium_id).map_err(db_error)?;
    Ok(serde_json::json!({"deleted": true}))
}

/// Add fish or plants to an aquarium.
pub async fn add_inhabitant(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let kind: InhabitantKind = require_str(params, "kind")?
        .parse()
        .map_err(|e: aqua_types::TypesError| RpcError::invalid_params(&e.to_string()))?;
    let species = require_str(params, "species")?.trim();
    if species.is_empty() {
        return Err(RpcError::invalid_params("species must not be empty"));
    }
    let quantity = quantity_param(params)?;

    let db = state.db.lock().await;
    let id = inhabitants::insert(&db, aquarium_id, kind, species, quantity, now_secs())
        .map_err(db_error)?;
    let row = inhabitants::get(&db, id).map_err(db_error)?;
    to_json(&row)
}

/// List the inhabitants of an aquarium.
pub async fn list_inhabitants(state: &Arc<DaemonState>, params: &Value) -> Result {
    let aquarium_id = require_i64(params, "aquarium_id")?;
    let db = state.db.lock().await;
    aquariums::get(&db, aquarium_id).map_err(db_error)?;
    let rows = inhabitants::list(&db, aquarium_id).map_err(db_error)?;
    to_json(&rows)
}

/// Change the head count of an inhabitant row.
pub async fn set_inhabitant_quantity(state: &Arc<DaemonState>, params: &Value) -> Result {
    let inhabitant_id = require_i64(params, "inhabitant_id")?;
    let quantity = quantity_param(params)?;
    let db = state.db.lock().await;
    inhabitants::set_quantity(&db, inhabitant_id, quantity).map_err(db_error)?;
    let row = inhabitants::get(&db, inhabitant_id).map_err(db_error)?;
    to_json(&row)
}

/// Remove an inhabitant row.
pub async fn remove_inhabitant(state: &Arc<DaemonState>, params: &Value) -> Result {
    let inhabitant_id = require_i64(params, "inhabitant_id")?;
    let db = state.db.lock().await;
    inhabitants::remove(&db, inhabitant_id).map_err(db_error)?;
    Ok(serde_json::json!({"removed": true}))
}

/// Head count parameter. Counts past `u32::MAX` are refused here; zero and
/// negatives are left to the schema, which reports a constraint violation.
fn quantity_param(params: &Value) -> std::result::Result<i64, RpcError> {
    let quantity = require_i64(params, "quantity")?;
    if quantity > i64::from(u32::MAX) {
        return Err(RpcError::invalid_params(&format!(
            "quantity must be at most {}",
            u32::MAX
        )));
    }
    Ok(quantity)
}
