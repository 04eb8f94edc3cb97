use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entity::api::{self, ActiveModel, Column, Entity as ApiEntity};
use crate::entity::group::Entity as GroupEntity;
use crate::error::{AppError, AppResult};
use crate::models::{Api, ApiType, CreateApi, Group, OrderUpdate, UpdateApi};
use crate::repositories::{
    contains_folded, folds_in_rust, like_contains_pattern, GroupRepository, Repository,
};

/// API repository for database operations
pub struct ApiRepository;

#[async_trait]
impl Repository<Api> for ApiRepository {
    async fn find_by_id(db: &DatabaseConnection, id: i32) -> AppResult<Api> {
        let model = ApiEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("API".to_string()))?;

        Ok(model.into())
    }

    async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<()> {
        let result = ApiEntity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("API".to_string()));
        }

        tracing::info!(api_id = id, "API deleted");
        Ok(())
    }
}

impl ApiRepository {
    /// Create a new API at the end of its group
    pub async fn create(db: &DatabaseConnection, input: &CreateApi) -> AppResult<Api> {
        let api_type = input.validate()?;

        // The owning group must exist
        GroupRepository::find_by_id(db, input.group_id).await?;

        let last = ApiEntity::find()
            .filter(Column::GroupId.eq(input.group_id))
            .order_by_desc(Column::SortOrder)
            .one(db)
            .await?;
        let next_order = last.map_or(1, |a| a.sort_order + 1);

        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            group_id: Set(input.group_id),
            name: Set(input.name.trim().to_string()),
            endpoint: Set(input.endpoint.trim().to_string()),
            method: Set(input.method.clone().unwrap_or_default()),
            api_type: Set(api_type.as_str().to_string()),
            sort_order: Set(next_order),
            note: Set(input.note.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(db).await?;
        tracing::info!(api_id = result.id, group_id = result.group_id, "API created");
        Ok(result.into())
    }

    /// List APIs of a group in display order
    pub async fn list_by_group(db: &DatabaseConnection, group_id: i32) -> AppResult<Vec<Api>> {
        let models = ApiEntity::find()
            .filter(Column::GroupId.eq(group_id))
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Count APIs in a group
    pub async fn count_by_group(db: &DatabaseConnection, group_id: i32) -> AppResult<u64> {
        let count = ApiEntity::find()
            .filter(Column::GroupId.eq(group_id))
            .count(db)
            .await?;

        Ok(count)
    }

    /// Find an API together with its group
    pub async fn find_with_group(
        db: &DatabaseConnection,
        id: i32,
    ) -> AppResult<(Api, Option<Group>)> {
        let (api, group) = ApiEntity::find_by_id(id)
            .find_also_related(GroupEntity)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("API".to_string()))?;

        Ok((api.into(), group.map(Group::from)))
    }

    /// Fetch the given APIs with their groups, in the order the ids were given.
    /// Unknown ids are skipped.
    pub async fn find_many_with_group(
        db: &DatabaseConnection,
        ids: &[i32],
    ) -> AppResult<Vec<(Api, Option<Group>)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = ApiEntity::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .find_also_related(GroupEntity)
            .all(db)
            .await?;

        let mut found: Vec<(Api, Option<Group>)> = rows
            .into_iter()
            .map(|(api, group)| (api.into(), group.map(Group::from)))
            .collect();
        found.sort_by_key(|(api, _)| ids.iter().position(|id| *id == api.id));
        found.dedup_by_key(|(api, _)| api.id);

        Ok(found)
    }

    /// Case-insensitive substring search over name and endpoint
    pub async fn search(
        db: &DatabaseConnection,
        query: &str,
        limit: u64,
    ) -> AppResult<Vec<(Api, Option<Group>)>> {
        let needle = query.to_lowercase();
        let in_rust = folds_in_rust(db);

        let mut select = ApiEntity::find()
            .find_also_related(GroupEntity)
            .order_by_asc(Column::GroupId)
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id);
        if !in_rust {
            let pattern = like_contains_pattern(query);
            let contains = |column: Column| {
                Expr::expr(Func::lower(Expr::col((ApiEntity, column))))
                    .like(LikeExpr::new(pattern.clone()).escape('\\'))
            };
            select = select
                .filter(
                    Condition::any()
                        .add(contains(Column::Name))
                        .add(contains(Column::Endpoint)),
                )
                .limit(limit);
        }
        let rows = select.all(db).await?;

        Ok(rows
            .into_iter()
            .filter(|(api, _)| {
                !in_rust
                    || contains_folded(&api.name, &needle)
                    || contains_folded(&api.endpoint, &needle)
            })
            .take(limit as usize)
            .map(|(api, group)| (api.into(), group.map(Group::from)))
            .collect())
    }

    /// Partial update of an API's basic info
    pub async fn update(db: &DatabaseConnection, id: i32, input: &UpdateApi) -> AppResult<Api> {
        let model = ApiEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("API".to_string()))?;

        let api_type: ApiType = match &input.api_type {
            Some(t) => t.parse()?,
            None => model.api_type.parse().unwrap_or(ApiType::Http),
        };
        let method = input.method.as_deref().unwrap_or(&model.method);
        if api_type == ApiType::Http && method.trim().is_empty() {
            return Err(AppError::Validation(
                "Method is required for HTTP APIs".to_string(),
            ));
        }

        let mut active: ActiveModel = model.into();

        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("API name cannot be empty".to_string()));
            }
            active.name = Set(name.trim().to_string());
        }
        if let Some(endpoint) = &input.endpoint {
            if endpoint.trim().is_empty() {
                return Err(AppError::Validation("Endpoint cannot be empty".to_string()));
            }
            active.endpoint = Set(endpoint.trim().to_string());
        }
        if let Some(method) = &input.method {
            active.method = Set(method.clone());
        }
        if input.api_type.is_some() {
            active.api_type = Set(api_type.as_str().to_string());
        }
        if let Some(note) = &input.note {
            active.note = Set(Some(note.clone()));
        }
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Replace the note; `None` clears it
    pub async fn update_note(
        db: &DatabaseConnection,
        id: i32,
        note: Option<String>,
    ) -> AppResult<Api> {
        let model = ApiEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("API".to_string()))?;

        let mut active: ActiveModel = model.into();
        active.note = Set(note);
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active.update(db).await?;
        Ok(result.into())
    }

    /// Apply new display positions, all or nothing
    pub async fn update_orders(db: &DatabaseConnection, orders: &[OrderUpdate]) -> AppResult<()> {
        let txn = db.begin().await?;

        for item in orders {
            ApiEntity::update_many()
                .col_expr(Column::SortOrder, Expr::value(item.order))
                .filter(Column::Id.eq(item.id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

// Conversion from SeaORM model to our domain model
impl From<api::Model> for Api {
    fn from(m: api::Model) -> Self {
        Self {
            id: m.id,
            group_id: m.group_id,
            name: m.name,
            endpoint: m.endpoint,
            method: m.method,
            api_type: m.api_type,
            order: m.sort_order,
            note: m.note,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
