//! JSON-RPC server over Unix socket.
//!
//! Listens on a Unix domain socket, accepts connections, and dispatches
//! newline-delimited JSON-RPC calls to the command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Method name.
    pub method: String,
    /// Parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// JSON-RPC version.
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcError {
    pub code: i32,
    /// Error name.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Create a success response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    // Standard JSON-RPC errors

    /// Parse error (-32700).
    pub fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "PARSE_ERROR".to_string(),
            data: None,
        }
    }

    /// Invalid request (-32600).
    pub fn invalid_request() -> Self {
        Self {
            code: -32600,
            message: "INVALID_REQUEST".to_string(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "METHOD_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"method": method})),
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(detail: &str) -> Self {
        Self {
            code: -32602,
            message: "INVALID_PARAMS".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: -32603,
            message: "INTERNAL_ERROR".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    // Domain errors

    /// Referenced row does not exist (-32004).
    pub fn not_found(detail: &str) -> Self {
        Self {
            code: -32004,
            message: "NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Schema constraint rejected the write (-32009).
    pub fn constraint_violation(detail: &str) -> Self {
        Self {
            code: -32009,
            message: "CONSTRAINT_VIOLATION".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Physically implausible reading (-32022).
    pub fn invalid_input(detail: &str) -> Self {
        Self {
            code: -32022,
            message: "INVALID_INPUT".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    /// Create a new RPC server.
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        // Remove stale socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("IPC server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) = handle_connection(state, reader, writer).await {
                            warn!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Serve one client until EOF, one JSON request per line.
async fn handle_connection<R, W>(
    state: Arc<DaemonState>,
    reader: R,
    mut writer: W,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => dispatch_request(state.clone(), request).await,
            Err(_) => RpcResponse::error(serde_json::Value::Null, RpcError::parse_error()),
        };

        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Dispatch a JSON-RPC request to the appropriate command handler.
async fn dispatch_request(state: Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let method = request.method.as_str();
    let params = &request.params;

    if request.jsonrpc != "2.0" {
        return RpcResponse::error(id, RpcError::invalid_request());
    }

    debug!("Dispatching RPC method: {}", method);

    let result = match method {
        // Users
        "register_user" => commands::users::register_user(&state, params).await,
        "get_user" => commands::users::get_user(&state, params).await,
        "delete_user" => commands::users::delete_user(&state, params).await,

        // Aquariums & inhabitants
        "create_aquarium" => commands::aquariums::create_aquarium(&state, params).await,
        "list_aquariums" => commands::aquariums::list_aquariums(&state, params).await,
        "get_aquarium" => commands::aquariums::get_aquarium(&state, params).await,
        "set_aquarium_volume" => commands::aquariums::set_aquarium_volume(&state, params).await,
        "delete_aquarium" => commands::aquariums::delete_aquarium(&state, params).await,
        "add_inhabitant" => commands::aquariums::add_inhabitant(&state, params).await,
        "list_inhabitants" => commands::aquariums::list_inhabitants(&state, params).await,
        "set_inhabitant_quantity" => {
            commands::aquariums::set_inhabitant_quantity(&state, params).await
        }
        "remove_inhabitant" => commands::aquariums::remove_inhabitant(&state, params).await,

        // Measurements
        "record_measurement" => commands::measurements::record_measurement(&state, params).await,
        "list_measurements" => commands::measurements::list_measurements(&state, params).await,
        "get_param_series" => commands::measurements::get_param_series(&state, params).await,
        "delete_measurement" => commands::measurements::delete_measurement(&state, params).await,

        // Water changes
        "set_water_change_settings" => {
            commands::water::set_water_change_settings(&state, params).await
        }
        "get_water_change_settings" => {
            commands::water::get_water_change_settings(&state, params).await
        }
        "log_water_change" => commands::water::log_water_change(&state, params).await,
        "list_water_changes" => commands::water::list_water_changes(&state, params).await,
        "get_water_change_status" => commands::water::get_water_change_status(&state, params).await,

        // Chemistry
        "calc_ammonia" => commands::chemistry::calc_ammonia(&state, params).await,
        "check_species_tolerance" => {
            commands::chemistry::check_species_tolerance(&state, params).await
        }
        "upsert_species" => commands::chemistry::upsert_species(&state, params).await,
        "list_species" => commands::chemistry::list_species(&state).await,

        // Diagnostics
        "get_setting" => commands::diagnostics::get_setting(&state, params).await,
        "set_setting" => commands::diagnostics::set_setting(&state, params).await,
        "export_diagnostics" => commands::diagnostics::export_diagnostics(&state).await,
        "shutdown" => commands::diagnostics::shutdown(&state).await,

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => {
            debug!(method, code = err.code, "RPC call failed: {}", err.message);
            RpcResponse::error(id, err)
        }
    }
}
