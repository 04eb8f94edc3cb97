use axum::{extract::State, Json};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Liveness check that also pings the database
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Database unreachable")
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    state.db.execute_unprepared("SELECT 1").await?;

    Ok(Json(HealthResponse {
        status: "ok",
        database: "up",
    }))
}
