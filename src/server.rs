use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::catalog::Catalog;
use crate::config::{ConfigError, ServerConfig};
use crate::filter::FilterEngine;
use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// MCP resource server speaking newline-delimited JSON-RPC 2.0.
///
/// One request is read, fully handled and answered before the next line is
/// read. The catalog is owned here and touched by nothing else.
pub struct McpServer {
    catalog: Catalog,
}

impl McpServer {
    /// Compile the filter and run the initial scan.
    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        let engine = FilterEngine::new(config.filter)?;
        let mut catalog = Catalog::new(config.root, engine);
        catalog.rebuild();
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve one session over any line reader and writer. Returns at EOF.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let n = reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                tracing::info!("input closed, shutting down");
                break;
            }

            if n > MAX_MESSAGE_BYTES {
                tracing::warn!(bytes = n, limit = MAX_MESSAGE_BYTES, "dropping oversized message");
                continue;
            }

            let line = match std::str::from_utf8(&raw) {
                Ok(s) => s.trim(),
                Err(e) => {
                    tracing::warn!(error = %e, "dropping non UTF-8 message");
                    continue;
                }
            };

            if line.is_empty() {
                continue;
            }

            if let Some(resp) = self.handle_line(line).await {
                write_response(&mut writer, &resp).await?;
            }
        }

        Ok(())
    }

    /// Handle one framed message. `None` means nothing is written back.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let req = match parse_request(line) {
            Ok(req) => req,
            Err((Some(id), detail)) => {
                tracing::warn!(error = %detail, "malformed request");
                return Some(JsonRpcResponse::error(
                    Some(id),
                    JsonRpcError::parse_error_with(format!("Parse error: {detail}")),
                ));
            }
            Err((None, detail)) => {
                tracing::warn!(error = %detail, "dropping malformed message without id");
                return None;
            }
        };

        if req.jsonrpc.as_deref().is_some_and(|v| v != "2.0") {
            if req.is_notification() {
                return None;
            }
            return Some(JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::invalid_request(),
            ));
        }

        tracing::debug!(method = %req.method, id = ?req.id, "request received");
        handlers::dispatch(&req, &mut self.catalog).await
    }
}

/// Parse a request, recovering the `id` from well-formed JSON that is not a
/// valid request so the error can still be correlated.
fn parse_request(line: &str) -> Result<JsonRpcRequest, (Option<RpcId>, String)> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| (None, e.to_string()))?;

    serde_json::from_value::<JsonRpcRequest>(value.clone()).map_err(|e| {
        let id = value
            .get("id")
            .and_then(|v| serde_json::from_value::<RpcId>(v.clone()).ok());
        (id, e.to_string())
    })
}

async fn write_response<W>(writer: &mut W, resp: &JsonRpcResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let out = serde_json::to_string(resp)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
