use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::models::{NewParameter, ParamKind, Parameter};
use crate::services::ParameterImporter;
use crate::state::AppState;

// ============ Request/Response DTOs ============

/// One parameter of a structured import, nested through `children`
#[derive(Debug, Deserialize, ToSchema)]
pub struct ParameterInput {
    pub name: String,
    /// string, number, boolean, array or object
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    #[serde(default)]
    #[schema(no_recursion)]
    pub children: Vec<ParameterInput>,
}

impl From<ParameterInput> for NewParameter {
    fn from(p: ParameterInput) -> Self {
        Self {
            name: p.name,
            param_type: ParamKind::from(p.param_type),
            required: p.required,
            description: p.description.filter(|d| !d.is_empty()),
            children: p.children.into_iter().map(|c| c.into()).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceParametersRequest {
    /// `request` or `response`
    #[serde(default)]
    pub param_type: String,
    #[serde(default)]
    pub parameters: Vec<ParameterInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParametersFromJsonRequest {
    /// `request` or `response`
    #[serde(default)]
    pub param_type: String,
    /// Example payload; must be a JSON object
    #[serde(default)]
    #[schema(value_type = Object)]
    pub json: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplaceParametersResponse {
    /// Rows written, nested ones included
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParametersFromJsonResponse {
    /// Top-level keys of the submitted JSON
    pub parameter_count: usize,
    /// Rows written, nested ones included
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParameterResponse {
    pub id: i32,
    pub api_id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: Option<String>,
    pub required: bool,
    /// `request` or `response`
    #[serde(rename = "paramType")]
    pub direction: String,
    pub order: i32,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
    #[schema(no_recursion)]
    pub children: Vec<ParameterResponse>,
}

impl From<Parameter> for ParameterResponse {
    fn from(p: Parameter) -> Self {
        Self {
            id: p.id,
            api_id: p.api_id,
            parent_id: p.parent_id,
            name: p.name,
            param_type: p.param_type.into(),
            description: p.description,
            required: p.required,
            direction: p.direction.as_str().to_string(),
            order: p.order,
            created_at: p.created_at,
            updated_at: p.updated_at,
            children: p.children.into_iter().map(|c| c.into()).collect(),
        }
    }
}

// ============ Handlers ============

/// Replace one side of an API's parameters with an explicit list
#[utoipa::path(
    put,
    path = "/api/apis/{id}/parameters",
    params(
        ("id" = i32, Path, description = "API ID")
    ),
    request_body = ReplaceParametersRequest,
    responses(
        (status = 200, description = "Parameters replaced", body = ReplaceParametersResponse),
        (status = 400, description = "Invalid paramType or parameter"),
        (status = 404, description = "API not found")
    ),
    tag = "Parameters"
)]
pub async fn replace_parameters(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ReplaceParametersRequest>,
) -> AppResult<Json<ReplaceParametersResponse>> {
    let parameters: Vec<NewParameter> = payload.parameters.into_iter().map(|p| p.into()).collect();

    let summary =
        ParameterImporter::replace_structured(&state.db, id, &payload.param_type, &parameters)
            .await?;
    Ok(Json(ReplaceParametersResponse {
        count: summary.count,
    }))
}

/// Regenerate one side of an API's parameters from example JSON
#[utoipa::path(
    post,
    path = "/api/apis/{id}/parameters/from-json",
    params(
        ("id" = i32, Path, description = "API ID")
    ),
    request_body = ParametersFromJsonRequest,
    responses(
        (status = 200, description = "Parameters regenerated", body = ParametersFromJsonResponse),
        (status = 400, description = "Invalid paramType or JSON"),
        (status = 404, description = "API not found")
    ),
    tag = "Parameters"
)]
pub async fn replace_parameters_from_json(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ParametersFromJsonRequest>,
) -> AppResult<Json<ParametersFromJsonResponse>> {
    let summary =
        ParameterImporter::replace_from_json(&state.db, id, &payload.param_type, &payload.json)
            .await?;
    Ok(Json(ParametersFromJsonResponse {
        parameter_count: summary.parameter_count,
        count: summary.count,
    }))
}
