use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One flat parameter row. The nested view is rebuilt on read from `parent_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parameters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub api_id: i32,
    #[sea_orm(indexed, nullable)]
    pub parent_id: Option<i32>,
    pub name: String,
    pub param_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub required: bool,
    #[sea_orm(indexed)]
    pub direction: String,
    pub sort_order: i32,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::api::Entity",
        from = "Column::ApiId",
        to = "super::api::Column::Id",
        on_delete = "Cascade"
    )]
    Api,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
}

impl Related<super::api::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Api.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
