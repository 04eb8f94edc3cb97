use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::services::catalog::CatalogService;

/// Read-only tools offered to an assistant over the tool endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTool {
    ListGroups,
    GetGroup,
    ListApisByGroup,
    GetApi,
    SearchApis,
    GetApiJsonExample,
}

impl QueryTool {
    pub const ALL: [QueryTool; 6] = [
        QueryTool::ListGroups,
        QueryTool::GetGroup,
        QueryTool::ListApisByGroup,
        QueryTool::GetApi,
        QueryTool::SearchApis,
        QueryTool::GetApiJsonExample,
    ];

    /// Parse a tool name. Names are matched exactly.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "list_groups" => Some(Self::ListGroups),
            "get_group" => Some(Self::GetGroup),
            "list_apis_by_group" => Some(Self::ListApisByGroup),
            "get_api" => Some(Self::GetApi),
            "search_apis" => Some(Self::SearchApis),
            "get_api_json_example" => Some(Self::GetApiJsonExample),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListGroups => "list_groups",
            Self::GetGroup => "get_group",
            Self::ListApisByGroup => "list_apis_by_group",
            Self::GetApi => "get_api",
            Self::SearchApis => "search_apis",
            Self::GetApiJsonExample => "get_api_json_example",
        }
    }
}

/// Run one tool call against the catalog and return its `data` payload
pub async fn run_tool(db: &DatabaseConnection, tool: QueryTool, args: &Map<String, Value>) -> AppResult<Value> {
    match tool {
        QueryTool::ListGroups => to_data(CatalogService::list_groups(db).await?),
        QueryTool::GetGroup => {
            let name = required_str(args, "groupName")?;
            to_data(CatalogService::group_overview(db, name).await?)
        }
        QueryTool::ListApisByGroup => {
            let name = required_str(args, "groupName")?;
            to_data(CatalogService::group_apis(db, name).await?)
        }
        QueryTool::GetApi => {
            let id = required_id(args, "apiId")?;
            to_data(CatalogService::api_detail(db, id).await?)
        }
        QueryTool::SearchApis => {
            let query = required_str(args, "query")?;
            to_data(CatalogService::search(db, query).await?)
        }
        QueryTool::GetApiJsonExample => {
            let id = required_id(args, "apiId")?;
            to_data(CatalogService::api_example(db, id).await?)
        }
    }
}

fn to_data<T: Serialize>(value: T) -> AppResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// A non-blank string argument
fn required_str<'a>(args: &'a Map<String, Value>, key: &str) -> AppResult<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", key)))
}

/// A positive integer id. JSON clients often send numbers as floats, so an
/// integral float is accepted too.
fn required_id(args: &Map<String, Value>, key: &str) -> AppResult<i32> {
    let invalid = || AppError::Validation(format!("{} (number) is required", key));

    let value = args.get(key).ok_or_else(invalid)?;
    let id = match value.as_i64() {
        Some(n) => n,
        None => {
            let f = value.as_f64().ok_or_else(invalid)?;
            if f.fract() != 0.0 || f < i64::MIN as f64 || f > i64::MAX as f64 {
                return Err(invalid());
            }
            f as i64
        }
    };

    i32::try_from(id).ok().filter(|id| *id > 0).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_tool_names_round_trip() {
        for tool in QueryTool::ALL {
            assert_eq!(QueryTool::parse(tool.as_str()), Some(tool));
        }
        assert_eq!(QueryTool::parse("LIST_GROUPS"), None);
        assert_eq!(QueryTool::parse(""), None);
    }

    #[test]
    fn test_required_str() {
        let a = args(json!({ "groupName": "  user  ", "blank": "", "num": 1 }));
        assert_eq!(required_str(&a, "groupName").unwrap(), "user");
        assert!(matches!(required_str(&a, "blank"), Err(AppError::Validation(_))));
        assert!(required_str(&a, "num").is_err());
        assert!(required_str(&a, "missing").is_err());
    }

    #[test]
    fn test_required_id() {
        let a = args(json!({
            "int": 7,
            "float": 7.0,
            "fraction": 7.5,
            "text": "7",
            "negative": -1,
            "huge": 9_999_999_999i64
        }));
        assert_eq!(required_id(&a, "int").unwrap(), 7);
        assert_eq!(required_id(&a, "float").unwrap(), 7);
        assert!(required_id(&a, "fraction").is_err());
        assert!(required_id(&a, "text").is_err());
        assert!(required_id(&a, "negative").is_err());
        assert!(required_id(&a, "huge").is_err());
        assert!(matches!(required_id(&a, "missing"), Err(AppError::Validation(_))));
    }
}
