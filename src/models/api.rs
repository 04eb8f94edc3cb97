use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Api {
    pub id: i32,
    pub group_id: i32,
    pub name: String,
    pub endpoint: String,
    pub method: String, // GET, POST, PUT, DELETE, PATCH; empty for RPC
    #[serde(rename = "type")]
    pub api_type: String,
    pub order: i32,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Transport of an API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiType {
    Http,
    Rpc,
}

impl ApiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiType::Http => "HTTP",
            ApiType::Rpc => "RPC",
        }
    }
}

impl FromStr for ApiType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HTTP" => Ok(ApiType::Http),
            "RPC" => Ok(ApiType::Rpc),
            other => Err(AppError::Validation(format!(
                "Invalid type '{}'. Must be 'HTTP' or 'RPC'",
                other
            ))),
        }
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateApi {
    pub group_id: i32,
    pub name: String,
    pub endpoint: String,
    pub method: Option<String>,
    pub api_type: String,
    pub note: Option<String>,
}

impl CreateApi {
    /// Reject input that could never be stored as a usable API.
    pub fn validate(&self) -> Result<ApiType, AppError> {
        if self.group_id <= 0
            || self.name.trim().is_empty()
            || self.endpoint.trim().is_empty()
            || self.api_type.is_empty()
        {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }

        let api_type: ApiType = self.api_type.parse()?;
        let method_missing = self.method.as_deref().map_or(true, |m| m.trim().is_empty());
        if api_type == ApiType::Http && method_missing {
            return Err(AppError::Validation(
                "Method is required for HTTP APIs".to_string(),
            ));
        }

        Ok(api_type)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateApi {
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub method: Option<String>,
    pub api_type: Option<String>,
    pub note: Option<String>,
}
