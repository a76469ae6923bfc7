//! User command handlers.

use std::sync::Arc;

use aqua_db::queries::users;
use serde_json::Value;

use super::{db_error, now_secs, require_i64, to_json};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Register a platform user, or return the existing record.
pub async fn register_user(state: &Arc<DaemonState>, params: &Value) -> Result {
    let platform_user_id = require_i64(params, "platform_user_id")?;
    let username = params.get("username").and_then(Value::as_str);

    let db = state.db.lock().await;
    let user = users::upsert(&db, platform_user_id, username, now_secs()).map_err(db_error)?;
    tracing::info!(user_id = user.id, platform_user_id, "user registered");
    to_json(&user)
}

/// Look up a user by `user_id` or `platform_user_id`.
pub async fn get_user(state: &Arc<DaemonState>, params: &Value) -> Result {
    let db = state.db.lock().await;
    let user = if let Some(id) = params.get("user_id").and_then(Value::as_i64) {
        users::get(&db, id)
    } else {
        let platform_user_id = require_i64(params, "platform_user_id")
            .map_err(|_| RpcError::invalid_params("user_id or platform_user_id required"))?;
        users::get_by_platform_id(&db, platform_user_id)
    }
    .map_err(db_error)?;
    to_json(&user)
}

/// Delete a user and, by cascade, everything they own.
pub async fn delete_user(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = require_i64(params, "user_id")?;
    let db = state.db.lock().await;
    users::delete(&db, user_id).map_err(db_error)?;
    tracing::info!(user_id, "user deleted");
    Ok(serde_json::json!({"deleted": true}))
}
