// Library crate for Knot
// Exports modules for use by the binaries and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    call_tool, create_api, create_group, delete_api, delete_group, export_apis, get_api, health,
    list_apis_by_group, list_groups, list_groups_with_apis, replace_parameters,
    replace_parameters_from_json, update_api, update_api_note, update_api_orders, update_group,
    update_group_orders,
};
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        // Group routes
        .route("/api/groups", get(list_groups))
        .route("/api/groups", post(create_group))
        .route("/api/groups/with-apis", get(list_groups_with_apis))
        .route("/api/groups/orders", post(update_group_orders))
        .route("/api/groups/{id}", patch(update_group))
        .route("/api/groups/{id}", delete(delete_group))
        // API routes
        .route("/api/apis", post(create_api))
        .route("/api/apis/orders", post(update_api_orders))
        .route("/api/apis/group/{group_id}", get(list_apis_by_group))
        .route("/api/apis/{id}", get(get_api))
        .route("/api/apis/{id}", patch(update_api))
        .route("/api/apis/{id}", delete(delete_api))
        .route("/api/apis/{id}/note", patch(update_api_note))
        // Parameter routes
        .route("/api/apis/{id}/parameters", put(replace_parameters))
        .route(
            "/api/apis/{id}/parameters/from-json",
            post(replace_parameters_from_json),
        )
        // Export and assistant tools
        .route("/api/export", post(export_apis))
        .route("/api/mcp-tools", post(call_tool))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
