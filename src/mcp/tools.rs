use serde_json::{json, Value};

use knot::services::QueryTool;

const GROUP_NAME_HINT: &str =
    "Full or partial group name, matched case-insensitively. Examples: 'user', 'auth', 'payment'";
const API_ID_HINT: &str = "API id as returned by list_apis_by_group or search_apis";

fn description(tool: QueryTool) -> &'static str {
    match tool {
        QueryTool::ListGroups => {
            "List every API group with its id and name. Start here to explore the catalog."
        }
        QueryTool::GetGroup => {
            "Look up one group by full or partial name (e.g. 'user' finds 'USER-SERVICE') and report how many APIs it holds."
        }
        QueryTool::ListApisByGroup => {
            "List the APIs of a group found by full or partial name, with id, name, endpoint, method and type."
        }
        QueryTool::GetApi => {
            "Full documentation of one API: endpoint, method, type, group and the nested request and response parameters."
        }
        QueryTool::SearchApis => {
            "Search all groups for APIs whose name or endpoint contains the query, case-insensitively. Returns at most 50 hits."
        }
        QueryTool::GetApiJsonExample => {
            "Example request and response JSON bodies generated from an API's parameter definitions."
        }
    }
}

fn input_schema(tool: QueryTool) -> Value {
    match tool {
        QueryTool::ListGroups => json!({ "type": "object", "properties": {} }),
        QueryTool::GetGroup | QueryTool::ListApisByGroup => json!({
            "type": "object",
            "properties": {
                "groupName": { "type": "string", "description": GROUP_NAME_HINT }
            },
            "required": ["groupName"]
        }),
        QueryTool::GetApi | QueryTool::GetApiJsonExample => json!({
            "type": "object",
            "properties": {
                "apiId": { "type": "number", "description": API_ID_HINT }
            },
            "required": ["apiId"]
        }),
        QueryTool::SearchApis => json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Text to find in API names or endpoint paths. Examples: 'login', '/api/user'"
                }
            },
            "required": ["query"]
        }),
    }
}

/// The `tools/list` result
pub fn tools_json() -> Value {
    let tools: Vec<Value> = QueryTool::ALL
        .into_iter()
        .map(|tool| {
            json!({
                "name": tool.as_str(),
                "description": description(tool),
                "inputSchema": input_schema(tool),
            })
        })
        .collect();

    json!({ "tools": tools })
}
