use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::services::{run_tool, QueryTool};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToolCallRequest {
    /// One of list_groups, get_group, list_apis_by_group, get_api, search_apis, get_api_json_example
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToolCallResponse {
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Run a catalog query tool
#[utoipa::path(
    post,
    path = "/api/mcp-tools",
    request_body = ToolCallRequest,
    responses(
        (status = 200, description = "Tool result", body = ToolCallResponse),
        (status = 400, description = "Unknown tool or invalid arguments"),
        (status = 404, description = "No matching group or API")
    ),
    tag = "Tools"
)]
pub async fn call_tool(
    State(state): State<AppState>,
    Json(payload): Json<ToolCallRequest>,
) -> AppResult<Json<ToolCallResponse>> {
    if payload.tool.is_empty() {
        return Err(AppError::Validation("Tool name is required".to_string()));
    }
    let tool = QueryTool::parse(&payload.tool)
        .ok_or_else(|| AppError::Validation(format!("Unknown tool: {}", payload.tool)))?;

    tracing::debug!(tool = tool.as_str(), "Tool call");
    let data = run_tool(&state.db, tool, &payload.args).await?;
    Ok(Json(ToolCallResponse { data }))
}
