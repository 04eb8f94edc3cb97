use uuid::Uuid;

use knot::models::{Api, CreateApi, CreateGroup, Group, NewParameter};
use knot::repositories::{ApiRepository, GroupRepository};
use knot::services::ParameterImporter;
use knot::state::AppState;

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test group with a unique name
    pub async fn create_group(&self) -> Group {
        self.create_group_with_name(&format!("group-{}", Uuid::new_v4()))
            .await
    }

    /// Create a test group with a specific name
    pub async fn create_group_with_name(&self, name: &str) -> Group {
        let input = CreateGroup {
            name: name.to_string(),
        };

        GroupRepository::create(&self.state.db, &input).await.unwrap()
    }

    /// Create a test HTTP API
    pub async fn create_api(&self, group_id: i32) -> Api {
        self.create_api_with(group_id, &format!("Test API {}", Uuid::new_v4()), "/api/test")
            .await
    }

    /// Create a test HTTP API with a specific name and endpoint
    pub async fn create_api_with(&self, group_id: i32, name: &str, endpoint: &str) -> Api {
        let input = CreateApi {
            group_id,
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            method: Some("POST".to_string()),
            api_type: "HTTP".to_string(),
            note: None,
        };

        ApiRepository::create(&self.state.db, &input).await.unwrap()
    }

    /// Replace one side of an API's parameters
    pub async fn set_parameters(&self, api_id: i32, direction: &str, parameters: &[NewParameter]) {
        ParameterImporter::replace_structured(&self.state.db, api_id, direction, parameters)
            .await
            .unwrap();
    }
}
