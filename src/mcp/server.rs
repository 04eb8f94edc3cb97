use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use knot::services::QueryTool;

use crate::client::ToolBackend;
use crate::tools::tools_json;

const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct McpResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Serialize)]
struct McpError {
    code: i32,
    message: String,
}

impl McpResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(McpError { code, message }),
        }
    }
}

fn tool_ok(data: &Value) -> Value {
    match serde_json::to_string_pretty(data) {
        Ok(text) => json!({ "content": [{ "type": "text", "text": text }] }),
        Err(e) => tool_err(format!("Failed to format result: {}", e)),
    }
}

fn tool_err(msg: impl Display) -> Value {
    json!({ "content": [{ "type": "text", "text": format!("Error: {}", msg) }], "isError": true })
}

/// Serve newline-delimited JSON-RPC until the input closes
pub async fn serve<R, W, B>(mut reader: R, mut writer: W, backend: &B) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    B: ToolBackend + ?Sized,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(line.trim_end_matches(['\n', '\r']), backend).await,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping line that is not UTF-8");
                Some(McpResponse::err(
                    Value::Null,
                    -32700,
                    format!("Parse error: {}", e),
                ))
            }
        };

        if let Some(response) = response {
            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }
    }

    tracing::info!("Input closed, stopping");
    Ok(())
}

async fn handle_line<B: ToolBackend + ?Sized>(line: &str, backend: &B) -> Option<McpResponse> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(McpResponse::err(
                Value::Null,
                -32700,
                format!("Parse error: {}", e),
            ))
        }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: McpRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return Some(McpResponse::err(
                id,
                -32600,
                format!("Invalid Request: {}", e),
            ))
        }
    };

    // Notifications get no reply
    let id = request.id?;

    let response = match request.method.as_str() {
        "initialize" => McpResponse::ok(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "knot-mcp", "version": env!("CARGO_PKG_VERSION") }
            }),
        ),
        "ping" => McpResponse::ok(id, json!({})),
        "tools/list" => McpResponse::ok(id, tools_json()),
        "tools/call" => call_tool(id, &request.params, backend).await,
        other => McpResponse::err(id, -32601, format!("Method not found: {}", other)),
    };

    Some(response)
}

async fn call_tool<B: ToolBackend + ?Sized>(id: Value, params: &Value, backend: &B) -> McpResponse {
    let name = params.get("name").and_then(Value::as_str).unwrap_or("");
    let Some(tool) = QueryTool::parse(name) else {
        return McpResponse::err(id, -32602, format!("Unknown tool: '{}'", name));
    };

    let args = params
        .get("arguments")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    tracing::debug!(tool = tool.as_str(), "Forwarding tool call");
    let result = match backend.call(tool.as_str(), args).await {
        Ok(data) => tool_ok(&data),
        Err(msg) => tool_err(msg),
    };

    McpResponse::ok(id, result)
}
