//! IPC command handlers.
//!
//! Each submodule implements the commands for one IPC category.

pub mod aquariums;
pub mod chemistry;
pub mod diagnostics;
pub mod measurements;
pub mod users;
pub mod water;

use aqua_db::DbError;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::rpc::RpcError;

/// Map a storage error onto an RPC error code.
pub(crate) fn db_error(e: DbError) -> RpcError {
    match e {
        DbError::NotFound(what) => RpcError::not_found(&what),
        DbError::Constraint(detail) => RpcError::constraint_violation(&detail),
        DbError::Chem(err) => RpcError::invalid_input(&err.to_string()),
        other => RpcError::internal_error(&format!("db error: {other}")),
    }
}

/// Required integer parameter.
pub(crate) fn require_i64(params: &Value, key: &str) -> Result<i64, RpcError> {
    params
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// Required string parameter.
pub(crate) fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, RpcError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// Optional numeric parameter; present but non-numeric is an error.
pub(crate) fn optional_f64(params: &Value, key: &str) -> Result<Option<f64>, RpcError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| RpcError::invalid_params(&format!("{key} must be a number"))),
    }
}

/// Optional non-negative integer parameter.
pub(crate) fn optional_u64(params: &Value, key: &str) -> Result<Option<u64>, RpcError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| RpcError::invalid_params(&format!("{key} must be a non-negative integer"))),
    }
}

/// Deserialize the whole params object into `T`.
pub(crate) fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, RpcError> {
    serde_json::from_value(params.clone()).map_err(|e| RpcError::invalid_params(&e.to_string()))
}

/// Serialize a handler result.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// Current Unix time in seconds.
pub(crate) fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
pub(crate) fn test_state() -> std::sync::Arc<crate::DaemonState> {
    let conn = aqua_db::open_memory().expect("open test db");
    let (shutdown_tx, _) = tokio::sync::broadcast::channel(1);
    std::sync::Arc::new(crate::DaemonState::new(
        conn,
        crate::config::DaemonConfig::default(),
        shutdown_tx,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_db_error_mapping() {
        assert_eq!(db_error(DbError::NotFound("aquarium 1".into())).code, -32004);
        assert_eq!(db_error(DbError::Constraint("CHECK".into())).code, -32009);
        assert_eq!(db_error(DbError::Migration("x".into())).code, -32603);
    }

    #[test]
    fn test_param_helpers() {
        let params = json!({"id": 4, "name": "Reef", "ph": 7.1, "bad": "x"});
        assert_eq!(require_i64(&params, "id").expect("id"), 4);
        assert_eq!(require_str(&params, "name").expect("name"), "Reef");
        assert_eq!(optional_f64(&params, "ph").expect("ph"), Some(7.1));
        assert_eq!(optional_f64(&params, "kh").expect("kh"), None);
        assert!(optional_f64(&params, "bad").is_err());
        assert!(require_i64(&params, "missing").is_err());
        assert!(optional_u64(&json!({"n": -1}), "n").is_err());
    }
}
