use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;

/// Which side of an exchange a parameter describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }
}

impl FromStr for Direction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(Direction::Request),
            "response" => Ok(Direction::Response),
            _ => Err(AppError::Validation(
                "Invalid paramType. Must be 'request' or 'response'".to_string(),
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared value type of a parameter.
///
/// Tags outside the five known ones can arrive through the structured import
/// and are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Other(String),
}

impl ParamKind {
    pub fn as_str(&self) -> &str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Array => "array",
            ParamKind::Object => "object",
            ParamKind::Other(tag) => tag,
        }
    }

    /// Object and array nodes are the only ones whose children carry meaning.
    pub fn is_container(&self) -> bool {
        matches!(self, ParamKind::Array | ParamKind::Object)
    }
}

impl From<String> for ParamKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "string" => ParamKind::String,
            "number" => ParamKind::Number,
            "boolean" => ParamKind::Boolean,
            "array" => ParamKind::Array,
            "object" => ParamKind::Object,
            _ => ParamKind::Other(s),
        }
    }
}

impl From<&str> for ParamKind {
    fn from(s: &str) -> Self {
        ParamKind::from(s.to_string())
    }
}

impl From<ParamKind> for String {
    fn from(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored parameter. `children` is empty for rows fresh from storage and is
/// only populated by the tree builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: i32,
    pub api_id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamKind,
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "paramType")]
    pub direction: Direction,
    pub order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub children: Vec<Parameter>,
}

impl Parameter {
    /// Description if present and non-empty.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// A parameter to be inserted, nested through `children`.
///
/// Produced by the structured import payload and by the JSON converter; ids
/// and order are assigned at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParameter {
    pub name: String,
    pub param_type: ParamKind,
    pub required: bool,
    pub description: Option<String>,
    pub children: Vec<NewParameter>,
}

impl NewParameter {
    pub fn new(name: impl Into<String>, param_type: ParamKind) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            description: None,
            children: Vec::new(),
        }
    }
}
