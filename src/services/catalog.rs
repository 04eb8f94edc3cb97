use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::{AppError, AppResult};
use crate::models::{Api, Direction, Group, Parameter};
use crate::repositories::{ApiRepository, GroupRepository, ParameterRepository, Repository};
use crate::services::example::generate_example;
use crate::services::tree::build_tree;

/// Most rows a search returns.
pub const SEARCH_LIMIT: u64 = 50;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: i32,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOverview {
    pub id: i32,
    pub name: String,
    pub api_count: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRef {
    pub id: i32,
    pub name: String,
}

impl From<&Group> for GroupRef {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id,
            name: g.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiSummary {
    pub id: i32,
    pub name: String,
    pub endpoint: String,
    pub method: String,
    #[serde(rename = "type")]
    pub api_type: String,
}

impl From<&Api> for ApiSummary {
    fn from(a: &Api) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            endpoint: a.endpoint.clone(),
            method: a.method.clone(),
            api_type: a.api_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupApis {
    pub group: GroupRef,
    pub apis: Vec<ApiSummary>,
}

/// An API with its group and both parameter forests
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDetail {
    #[serde(flatten)]
    pub api: Api,
    pub group: Option<GroupRef>,
    pub request_parameters: Vec<Parameter>,
    pub response_parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub api: ApiSummary,
    pub group: Option<GroupRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub count: usize,
    pub apis: Vec<SearchHit>,
}

/// Example payloads; a side with no parameters is `null`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiExample {
    pub api_name: String,
    pub endpoint: String,
    pub method: String,
    pub request_example: Option<Value>,
    pub response_example: Option<Value>,
}

/// One API ready for rendering
#[derive(Debug, Clone)]
pub struct ExportEntry {
    pub api: Api,
    pub group_name: Option<String>,
    pub request_parameters: Vec<Parameter>,
    pub response_parameters: Vec<Parameter>,
}

/// Read side shared by the export and the query tools
pub struct CatalogService;

impl CatalogService {
    pub async fn list_groups(db: &DatabaseConnection) -> AppResult<Vec<GroupSummary>> {
        let groups = GroupRepository::list(db).await?;
        Ok(groups
            .into_iter()
            .map(|g| GroupSummary {
                id: g.id,
                name: g.name,
                created_at: g.created_at,
            })
            .collect())
    }

    pub async fn group_overview(db: &DatabaseConnection, group_name: &str) -> AppResult<GroupOverview> {
        let group = Self::lookup_group(db, group_name).await?;
        let api_count = ApiRepository::count_by_group(db, group.id).await?;

        Ok(GroupOverview {
            id: group.id,
            name: group.name,
            api_count,
            created_at: group.created_at,
        })
    }

    pub async fn group_apis(db: &DatabaseConnection, group_name: &str) -> AppResult<GroupApis> {
        let group = Self::lookup_group(db, group_name).await?;
        let apis = ApiRepository::list_by_group(db, group.id).await?;

        Ok(GroupApis {
            group: GroupRef::from(&group),
            apis: apis.iter().map(ApiSummary::from).collect(),
        })
    }

    pub async fn api_detail(db: &DatabaseConnection, api_id: i32) -> AppResult<ApiDetail> {
        let (api, group) = ApiRepository::find_with_group(db, api_id).await?;
        let (request_parameters, response_parameters) = Self::parameter_forests(db, api_id).await?;

        Ok(ApiDetail {
            api,
            group: group.as_ref().map(GroupRef::from),
            request_parameters,
            response_parameters,
        })
    }

    pub async fn search(db: &DatabaseConnection, query: &str) -> AppResult<SearchResult> {
        let rows = ApiRepository::search(db, query, SEARCH_LIMIT).await?;
        let apis: Vec<SearchHit> = rows
            .iter()
            .map(|(api, group)| SearchHit {
                api: ApiSummary::from(api),
                group: group.as_ref().map(GroupRef::from),
            })
            .collect();

        Ok(SearchResult {
            count: apis.len(),
            apis,
        })
    }

    pub async fn api_example(db: &DatabaseConnection, api_id: i32) -> AppResult<ApiExample> {
        let api = ApiRepository::find_by_id(db, api_id).await?;
        let (request, response) = Self::parameter_forests(db, api_id).await?;

        let example = |forest: &[Parameter]| (!forest.is_empty()).then(|| generate_example(forest));
        Ok(ApiExample {
            request_example: example(&request),
            response_example: example(&response),
            api_name: api.name,
            endpoint: api.endpoint,
            method: api.method,
        })
    }

    /// Load the given APIs for export, keeping the caller's order
    pub async fn export_entries(db: &DatabaseConnection, api_ids: &[i32]) -> AppResult<Vec<ExportEntry>> {
        let rows = ApiRepository::find_many_with_group(db, api_ids).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for (api, group) in rows {
            let (request_parameters, response_parameters) = Self::parameter_forests(db, api.id).await?;
            entries.push(ExportEntry {
                api,
                group_name: group.map(|g| g.name),
                request_parameters,
                response_parameters,
            });
        }

        Ok(entries)
    }

    /// Request and response forests of one API
    async fn parameter_forests(
        db: &DatabaseConnection,
        api_id: i32,
    ) -> AppResult<(Vec<Parameter>, Vec<Parameter>)> {
        let rows = ParameterRepository::list_by_api(db, api_id).await?;
        let (request, response): (Vec<Parameter>, Vec<Parameter>) = rows
            .into_iter()
            .partition(|p| p.direction == Direction::Request);

        Ok((build_tree(&request)?, build_tree(&response)?))
    }

    async fn lookup_group(db: &DatabaseConnection, group_name: &str) -> AppResult<Group> {
        GroupRepository::find_by_name_fuzzy(db, group_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group matching '{}'", group_name)))
    }
}
