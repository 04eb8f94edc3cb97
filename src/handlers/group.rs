use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::api::ApiResponse;
use crate::handlers::common::{MessageResponse, OrderItem};
use crate::models::{CreateGroup, Group, GroupWithApis, OrderUpdate, UpdateGroup};
use crate::repositories::{GroupRepository, Repository};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateGroupRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupOrdersRequest {
    pub group_orders: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: i32,
    pub name: String,
    pub order: i32,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl From<Group> for GroupResponse {
    fn from(g: Group) -> Self {
        Self {
            id: g.id,
            name: g.name,
            order: g.order,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupWithApisResponse {
    #[serde(flatten)]
    pub group: GroupResponse,
    pub apis: Vec<ApiResponse>,
}

impl From<GroupWithApis> for GroupWithApisResponse {
    fn from(g: GroupWithApis) -> Self {
        Self {
            group: g.group.into(),
            apis: g.apis.into_iter().map(|a| a.into()).collect(),
        }
    }
}

// ============ Handlers ============

/// List all groups in display order
#[utoipa::path(
    get,
    path = "/api/groups",
    responses(
        (status = 200, description = "List of groups", body = Vec<GroupResponse>)
    ),
    tag = "Groups"
)]
pub async fn list_groups(State(state): State<AppState>) -> AppResult<Json<Vec<GroupResponse>>> {
    let groups = GroupRepository::list(&state.db).await?;
    Ok(Json(groups.into_iter().map(|g| g.into()).collect()))
}

/// List all groups with their APIs
#[utoipa::path(
    get,
    path = "/api/groups/with-apis",
    responses(
        (status = 200, description = "Groups with their APIs", body = Vec<GroupWithApisResponse>)
    ),
    tag = "Groups"
)]
pub async fn list_groups_with_apis(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<GroupWithApisResponse>>> {
    let groups = GroupRepository::list_with_apis(&state.db).await?;
    Ok(Json(groups.into_iter().map(|g| g.into()).collect()))
}

/// Create a new group
#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created successfully", body = GroupResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Group name already exists")
    ),
    tag = "Groups"
)]
pub async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroupRequest>,
) -> AppResult<(StatusCode, Json<GroupResponse>)> {
    let create_group = CreateGroup { name: payload.name };

    let group = GroupRepository::create(&state.db, &create_group).await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

/// Rename a group
#[utoipa::path(
    patch,
    path = "/api/groups/{id}",
    params(
        ("id" = i32, Path, description = "Group ID")
    ),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Group updated successfully", body = GroupResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Group not found"),
        (status = 409, description = "Group name already exists")
    ),
    tag = "Groups"
)]
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateGroupRequest>,
) -> AppResult<Json<GroupResponse>> {
    let update_group = UpdateGroup { name: payload.name };

    let group = GroupRepository::update(&state.db, id, &update_group).await?;
    Ok(Json(group.into()))
}

/// Reorder groups
#[utoipa::path(
    post,
    path = "/api/groups/orders",
    request_body = GroupOrdersRequest,
    responses(
        (status = 200, description = "Group order updated", body = MessageResponse)
    ),
    tag = "Groups"
)]
pub async fn update_group_orders(
    State(state): State<AppState>,
    Json(payload): Json<GroupOrdersRequest>,
) -> AppResult<Json<MessageResponse>> {
    let orders: Vec<OrderUpdate> = payload.group_orders.into_iter().map(|o| o.into()).collect();

    GroupRepository::update_orders(&state.db, &orders).await?;
    Ok(Json(MessageResponse::new("Group order updated")))
}

/// Delete a group and all of its APIs
#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    params(
        ("id" = i32, Path, description = "Group ID")
    ),
    responses(
        (status = 204, description = "Group deleted successfully"),
        (status = 404, description = "Group not found")
    ),
    tag = "Groups"
)]
pub async fn delete_group(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    GroupRepository::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
