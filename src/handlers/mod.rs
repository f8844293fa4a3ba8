pub mod resources_list;
pub mod resources_read;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ReadResourceParams, RpcId,
    ResourceError,
};

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Dispatch a JSON-RPC request against the catalog.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, catalog: &mut Catalog) -> Option<JsonRpcResponse> {
    if req.is_notification() {
        tracing::debug!(method = %req.method, "notification received");
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => {
            if let Some(params) = req
                .params
                .as_ref()
                .and_then(|v| serde_json::from_value::<InitializeParams>(v.clone()).ok())
            {
                let client = params.client_info.as_ref().and_then(|c| c.name.as_deref());
                tracing::info!(
                    client = client.unwrap_or("unknown"),
                    protocol = params.protocol_version.as_deref().unwrap_or("unspecified"),
                    "client initializing"
                );
            }

            let result = serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "resources": {
                        "subscribe": false,
                        "listChanged": false
                    }
                },
                "serverInfo": {
                    "name": "mcp-resource-server",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            JsonRpcResponse::success(req.id.clone(), result)
        }

        "ping" => JsonRpcResponse::success(req.id.clone(), serde_json::json!({})),

        "resources/list" | "list" => {
            let result = resources_list::handle(catalog).await;
            tracing::info!(
                resources = result.resources.len(),
                truncated = result.truncated,
                generation = result.generation,
                "resources/list served"
            );
            to_response(req.id.clone(), &result)
        }

        "resources/read" | "read" => {
            let outcome = match read_params(req) {
                Ok(params) => resources_read::handle(params, catalog).await,
                Err(err) => Err(err),
            };
            match outcome {
                Ok(result) => {
                    tracing::info!(id = %result.id, size = result.size, "resources/read served");
                    to_response(req.id.clone(), &result)
                }
                Err(err) => {
                    tracing::info!(code = ?err.code, message = %err.message, "resources/read failed");
                    JsonRpcResponse::error(req.id.clone(), err.into())
                }
            }
        }

        _ => {
            tracing::info!(method = %req.method, "unknown method");
            JsonRpcResponse::error(req.id.clone(), JsonRpcError::method_not_found(&req.method))
        }
    };

    Some(response)
}

fn read_params(req: &JsonRpcRequest) -> Result<ReadResourceParams, ResourceError> {
    match &req.params {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            ResourceError::invalid_params(format!("Invalid resources/read params: {e}"))
        }),
        None => Err(ResourceError::invalid_params(
            "Missing params for resources/read",
        )),
    }
}

fn to_response<T: Serialize>(id: Option<RpcId>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            tracing::error!(error = %e, "result serialization failed");
            JsonRpcResponse::error(id, JsonRpcError::internal_error("Internal error"))
        }
    }
}
