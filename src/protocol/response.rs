use serde::{Deserialize, Serialize};

use super::request::RpcId;
use crate::scanner::ResourceDescriptor;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object (protocol-level errors).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn parse_error_with(detail: impl Into<String>) -> Self {
        Self { code: -32700, message: detail.into(), data: None }
    }

    pub fn invalid_request() -> Self {
        Self { code: -32600, message: "Invalid Request".into(), data: None }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self { code: -32603, message: detail.into(), data: None }
    }
}

// ---------------------------------------------------------------------------
// Resource payloads (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// One entry of a `resources/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceEntry {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub description: String,
    pub size: u64,
    #[serde(rename = "mimeHint")]
    pub mime_hint: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl From<&ResourceDescriptor> for ResourceEntry {
    fn from(d: &ResourceDescriptor) -> Self {
        Self {
            id: d.id.clone(),
            uri: d.id.clone(),
            name: d.name.clone(),
            description: format!("Local file: {} ({} bytes)", d.name, d.size),
            size: d.size,
            mime_hint: d.mime_hint.clone(),
            mime_type: d.mime_hint.clone(),
        }
    }
}

/// `resources/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct ListResourcesResult {
    pub resources: Vec<ResourceEntry>,
    pub truncated: bool,
    pub generation: u64,
}

/// `resources/read` result.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    pub id: String,
    pub content: String,
    pub size: u64,
    #[serde(rename = "mimeHint")]
    pub mime_hint: String,
    pub contents: Vec<ResourceContents>,
}

/// MCP-shaped content block mirroring `content`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

impl ReadResourceResult {
    pub fn new(id: String, content: String, mime_hint: &str) -> Self {
        Self {
            contents: vec![ResourceContents {
                uri: id.clone(),
                mime_type: mime_hint.to_string(),
                text: content.clone(),
            }],
            size: content.len() as u64,
            id,
            content,
            mime_hint: mime_hint.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resource error types
// ---------------------------------------------------------------------------

/// Failure of a resource request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceErrorCode {
    InvalidParams,
    NotFound,
    SizeExceeded,
    IoError,
    InternalError,
}

impl ResourceErrorCode {
    /// Map to the corresponding JSON-RPC 2.0 error code.
    ///
    /// Bad input        → -32602 (Invalid params)
    /// Unknown resource → -32002 (MCP resource not found)
    /// Grown past limit → -32003
    /// Server failures  → -32603 (Internal error)
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::InvalidParams => -32602,
            Self::NotFound => -32002,
            Self::SizeExceeded => -32003,
            Self::IoError | Self::InternalError => -32603,
        }
    }
}

/// Resource error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ResourceError {
    pub code: ResourceErrorCode,
    pub message: String,
}

impl ResourceError {
    pub fn new(code: ResourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new(ResourceErrorCode::InvalidParams, detail)
    }

    pub fn not_found(id: &str) -> Self {
        Self::new(ResourceErrorCode::NotFound, format!("Resource not found: {id}"))
    }

    pub fn size_exceeded(id: &str, size: u64, limit: u64) -> Self {
        Self::new(
            ResourceErrorCode::SizeExceeded,
            format!("Resource {id} is {size} bytes, over the {limit} byte limit"),
        )
    }

    pub fn io(detail: impl Into<String>) -> Self {
        Self::new(ResourceErrorCode::IoError, detail)
    }
}

/// Top-level structured error, carried in the JSON-RPC error `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceErrorResponse {
    pub error: ResourceError,
}

/// The JSON-RPC `code` is derived from the resource error code and the
/// `message` is copied. The full structured error goes in `data`.
impl From<ResourceError> for JsonRpcError {
    fn from(err: ResourceError) -> Self {
        let code = err.code.json_rpc_code();
        let message = err.message.clone();
        let data = serde_json::to_value(ResourceErrorResponse { error: err }).ok();
        Self { code, message, data }
    }
}
