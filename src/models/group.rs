use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::Api;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A group together with its APIs in display order.
#[derive(Debug, Clone, Serialize)]
pub struct GroupWithApis {
    #[serde(flatten)]
    pub group: Group,
    pub apis: Vec<Api>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroup {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGroup {
    pub name: String,
}

/// New display position for one group or API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: i32,
    pub order: i32,
}
