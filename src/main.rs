use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use knot::config::Config;
use knot::handlers::{
    ApiDetailResponse, ApiOrdersRequest, ApiResponse, CreateApiRequest, CreateGroupRequest,
    ExportRequest, GroupOrdersRequest, GroupRefResponse, GroupResponse, GroupWithApisResponse,
    HealthResponse, MessageResponse, OrderItem, ParameterInput, ParameterResponse,
    ParametersFromJsonRequest, ParametersFromJsonResponse, ReplaceParametersRequest,
    ReplaceParametersResponse, ToolCallRequest, ToolCallResponse, UpdateApiRequest,
    UpdateGroupRequest, UpdateNoteRequest,
};
use knot::state::AppState;
use knot::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::group::list_groups,
        handlers::group::list_groups_with_apis,
        handlers::group::create_group,
        handlers::group::update_group,
        handlers::group::update_group_orders,
        handlers::group::delete_group,
        handlers::api::get_api,
        handlers::api::list_apis_by_group,
        handlers::api::create_api,
        handlers::api::update_api,
        handlers::api::update_api_note,
        handlers::api::update_api_orders,
        handlers::api::delete_api,
        handlers::parameter::replace_parameters,
        handlers::parameter::replace_parameters_from_json,
        handlers::export::export_apis,
        handlers::mcp_tools::call_tool,
    ),
    components(schemas(
        HealthResponse,
        MessageResponse,
        OrderItem,
        CreateGroupRequest,
        UpdateGroupRequest,
        GroupOrdersRequest,
        GroupResponse,
        GroupWithApisResponse,
        CreateApiRequest,
        UpdateApiRequest,
        UpdateNoteRequest,
        ApiOrdersRequest,
        ApiResponse,
        ApiDetailResponse,
        GroupRefResponse,
        ParameterInput,
        ParameterResponse,
        ReplaceParametersRequest,
        ReplaceParametersResponse,
        ParametersFromJsonRequest,
        ParametersFromJsonResponse,
        ExportRequest,
        ToolCallRequest,
        ToolCallResponse,
    )),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Groups", description = "API group management endpoints"),
        (name = "APIs", description = "API management endpoints"),
        (name = "Parameters", description = "Request/response parameter import endpoints"),
        (name = "Export", description = "HTML documentation export"),
        (name = "Tools", description = "Catalog query tools for assistants")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing; LOG_FORMAT=json switches to one JSON object per line
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = Config::from_env()?;
    let addr = config.server_addr();

    // Initialize application state (connects and creates missing tables)
    tracing::info!("Connecting to database...");
    let state = AppState::new(config).await?;
    tracing::info!("Database connection established");

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
