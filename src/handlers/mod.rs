pub mod api;
pub mod common;
pub mod export;
pub mod group;
pub mod health;
pub mod mcp_tools;
pub mod parameter;

pub use api::{
    create_api, delete_api, get_api, list_apis_by_group, update_api, update_api_note,
    update_api_orders, ApiDetailResponse, ApiOrdersRequest, ApiResponse, CreateApiRequest,
    GroupRefResponse, UpdateApiRequest, UpdateNoteRequest,
};
pub use common::{MessageResponse, OrderItem};
pub use export::{export_apis, ExportRequest};
pub use group::{
    create_group, delete_group, list_groups, list_groups_with_apis, update_group,
    update_group_orders, CreateGroupRequest, GroupOrdersRequest, GroupResponse,
    GroupWithApisResponse, UpdateGroupRequest,
};
pub use health::{health, HealthResponse};
pub use mcp_tools::{call_tool, ToolCallRequest, ToolCallResponse};
pub use parameter::{
    replace_parameters, replace_parameters_from_json, ParameterInput, ParameterResponse,
    ParametersFromJsonRequest, ParametersFromJsonResponse, ReplaceParametersRequest,
    ReplaceParametersResponse,
};
