use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Where `tools/call` requests are answered
#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// Run a tool and return its `data` payload, or a message for the caller
    async fn call(&self, tool: &str, args: Map<String, Value>) -> Result<Value, String>;
}

/// Forwards tool calls to a running Knot server
pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct DataBody {
    data: Value,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            endpoint: tool_endpoint(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn tool_endpoint(base_url: &str) -> String {
    format!("{}/api/mcp-tools", base_url.trim_end_matches('/'))
}

/// Turn an error body into the message shown to the assistant
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            details: Some(details),
            ..
        }) => details,
        Ok(ErrorBody { error, .. }) => error,
        Err(_) => format!("API call failed: {}", status),
    }
}

#[async_trait]
impl ToolBackend for HttpBackend {
    async fn call(&self, tool: &str, args: Map<String, Value>) -> Result<Value, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "tool": tool, "args": args }))
            .send()
            .await
            .map_err(|e| format!("API call failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;

        if !status.is_success() {
            tracing::debug!(tool, %status, "Tool call rejected");
            return Err(error_message(status, &body));
        }

        serde_json::from_str::<DataBody>(&body)
            .map(|b| b.data)
            .map_err(|e| format!("Failed to parse response: {}", e))
    }
}
