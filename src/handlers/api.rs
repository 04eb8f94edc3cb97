use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::common::{MessageResponse, OrderItem};
use crate::handlers::parameter::ParameterResponse;
use crate::models::{Api, CreateApi, OrderUpdate, UpdateApi};
use crate::repositories::{ApiRepository, ParameterRepository, Repository};
use crate::services::GroupRef;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiRequest {
    #[serde(default)]
    pub group_id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoint: String,
    pub method: Option<String>,
    /// `HTTP` or `RPC`
    #[serde(default, rename = "type")]
    pub api_type: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateApiRequest {
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub method: Option<String>,
    #[serde(rename = "type")]
    pub api_type: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    /// `null` clears the note
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrdersRequest {
    pub api_orders: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub id: i32,
    pub group_id: i32,
    pub name: String,
    pub endpoint: String,
    pub method: String,
    #[serde(rename = "type")]
    pub api_type: String,
    pub order: i32,
    pub note: Option<String>,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl From<Api> for ApiResponse {
    fn from(a: Api) -> Self {
        Self {
            id: a.id,
            group_id: a.group_id,
            name: a.name,
            endpoint: a.endpoint,
            method: a.method,
            api_type: a.api_type,
            order: a.order,
            note: a.note,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupRefResponse {
    pub id: i32,
    pub name: String,
}

impl From<GroupRef> for GroupRefResponse {
    fn from(g: GroupRef) -> Self {
        Self {
            id: g.id,
            name: g.name,
        }
    }
}

/// An API with its group and flat parameter rows in sibling order
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiDetailResponse {
    #[serde(flatten)]
    pub api: ApiResponse,
    pub group: Option<GroupRefResponse>,
    pub parameters: Vec<ParameterResponse>,
}

// ============ Handlers ============

/// Get an API with its group and parameters
#[utoipa::path(
    get,
    path = "/api/apis/{id}",
    params(
        ("id" = i32, Path, description = "API ID")
    ),
    responses(
        (status = 200, description = "API details", body = ApiDetailResponse),
        (status = 404, description = "API not found")
    ),
    tag = "APIs"
)]
pub async fn get_api(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiDetailResponse>> {
    let (api, group) = ApiRepository::find_with_group(&state.db, id).await?;
    let parameters = ParameterRepository::list_by_api(&state.db, id).await?;

    Ok(Json(ApiDetailResponse {
        api: api.into(),
        group: group.as_ref().map(|g| GroupRef::from(g).into()),
        parameters: parameters.into_iter().map(|p| p.into()).collect(),
    }))
}

/// List the APIs of a group in display order
#[utoipa::path(
    get,
    path = "/api/apis/group/{group_id}",
    params(
        ("group_id" = i32, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "List of APIs", body = Vec<ApiResponse>)
    ),
    tag = "APIs"
)]
pub async fn list_apis_by_group(
    State(state): State<AppState>,
    Path(group_id): Path<i32>,
) -> AppResult<Json<Vec<ApiResponse>>> {
    let apis = ApiRepository::list_by_group(&state.db, group_id).await?;
    Ok(Json(apis.into_iter().map(|a| a.into()).collect()))
}

/// Create a new API at the end of its group
#[utoipa::path(
    post,
    path = "/api/apis",
    request_body = CreateApiRequest,
    responses(
        (status = 201, description = "API created successfully", body = ApiResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Group not found")
    ),
    tag = "APIs"
)]
pub async fn create_api(
    State(state): State<AppState>,
    Json(payload): Json<CreateApiRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse>)> {
    let create_api = CreateApi {
        group_id: payload.group_id,
        name: payload.name,
        endpoint: payload.endpoint,
        method: payload.method,
        api_type: payload.api_type,
        note: payload.note,
    };

    let api = ApiRepository::create(&state.db, &create_api).await?;
    Ok((StatusCode::CREATED, Json(api.into())))
}

/// Update an API's basic info
#[utoipa::path(
    patch,
    path = "/api/apis/{id}",
    params(
        ("id" = i32, Path, description = "API ID")
    ),
    request_body = UpdateApiRequest,
    responses(
        (status = 200, description = "API updated successfully", body = ApiResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "API not found")
    ),
    tag = "APIs"
)]
pub async fn update_api(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateApiRequest>,
) -> AppResult<Json<ApiResponse>> {
    let update_api = UpdateApi {
        name: payload.name,
        endpoint: payload.endpoint,
        method: payload.method,
        api_type: payload.api_type,
        note: payload.note,
    };

    let api = ApiRepository::update(&state.db, id, &update_api).await?;
    Ok(Json(api.into()))
}

/// Set or clear an API's note
#[utoipa::path(
    patch,
    path = "/api/apis/{id}/note",
    params(
        ("id" = i32, Path, description = "API ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = ApiResponse),
        (status = 404, description = "API not found")
    ),
    tag = "APIs"
)]
pub async fn update_api_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateNoteRequest>,
) -> AppResult<Json<ApiResponse>> {
    let api = ApiRepository::update_note(&state.db, id, payload.note).await?;
    Ok(Json(api.into()))
}

/// Reorder APIs
#[utoipa::path(
    post,
    path = "/api/apis/orders",
    request_body = ApiOrdersRequest,
    responses(
        (status = 200, description = "API order updated", body = MessageResponse)
    ),
    tag = "APIs"
)]
pub async fn update_api_orders(
    State(state): State<AppState>,
    Json(payload): Json<ApiOrdersRequest>,
) -> AppResult<Json<MessageResponse>> {
    let orders: Vec<OrderUpdate> = payload.api_orders.into_iter().map(|o| o.into()).collect();

    ApiRepository::update_orders(&state.db, &orders).await?;
    Ok(Json(MessageResponse::new("API order updated")))
}

/// Delete an API and its parameters
#[utoipa::path(
    delete,
    path = "/api/apis/{id}",
    params(
        ("id" = i32, Path, description = "API ID")
    ),
    responses(
        (status = 204, description = "API deleted successfully"),
        (status = 404, description = "API not found")
    ),
    tag = "APIs"
)]
pub async fn delete_api(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    ApiRepository::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
