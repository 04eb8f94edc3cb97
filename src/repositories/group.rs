use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entity::api::{Column as ApiColumn, Entity as ApiEntity};
use crate::entity::group::{self, ActiveModel, Column, Entity as GroupEntity};
use crate::error::{AppError, AppResult};
use crate::models::{Api, CreateGroup, Group, GroupWithApis, OrderUpdate, UpdateGroup};
use crate::repositories::{contains_folded, folds_in_rust, like_contains_pattern, Repository};

/// Group repository for database operations
pub struct GroupRepository;

#[async_trait]
impl Repository<Group> for GroupRepository {
    async fn find_by_id(db: &DatabaseConnection, id: i32) -> AppResult<Group> {
        let model = GroupEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Group".to_string()))?;

        Ok(model.into())
    }

    async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<()> {
        let result = GroupEntity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Group".to_string()));
        }

        tracing::info!(group_id = id, "Group deleted");
        Ok(())
    }
}

impl GroupRepository {
    /// All groups in display order
    pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<Group>> {
        let models = GroupEntity::find()
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Create a new group at the end of the display order
    pub async fn create(db: &DatabaseConnection, input: &CreateGroup) -> AppResult<Group> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Group name is required".to_string()));
        }

        let last = GroupEntity::find()
            .order_by_desc(Column::SortOrder)
            .one(db)
            .await?;
        let next_order = last.map_or(1, |g| g.sort_order + 1);

        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            name: Set(name.to_string()),
            sort_order: Set(next_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(db)
            .await
            .map_err(|e| Self::name_conflict(e, name))?;
        Ok(result.into())
    }

    /// Rename a group
    pub async fn update(db: &DatabaseConnection, id: i32, input: &UpdateGroup) -> AppResult<Group> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Group name is required".to_string()));
        }

        let model = GroupEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Group".to_string()))?;

        let mut active: ActiveModel = model.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let result = active
            .update(db)
            .await
            .map_err(|e| Self::name_conflict(e, name))?;
        Ok(result.into())
    }

    /// Apply new display positions, all or nothing
    pub async fn update_orders(db: &DatabaseConnection, orders: &[OrderUpdate]) -> AppResult<()> {
        let txn = db.begin().await?;

        for item in orders {
            GroupEntity::update_many()
                .col_expr(Column::SortOrder, Expr::value(item.order))
                .filter(Column::Id.eq(item.id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// All groups with their APIs, both in display order
    pub async fn list_with_apis(db: &DatabaseConnection) -> AppResult<Vec<GroupWithApis>> {
        let groups = Self::list(db).await?;

        let mut apis_by_group: HashMap<i32, Vec<Api>> = HashMap::new();
        let api_models = ApiEntity::find()
            .order_by_asc(ApiColumn::SortOrder)
            .order_by_asc(ApiColumn::Id)
            .all(db)
            .await?;
        for model in api_models {
            apis_by_group
                .entry(model.group_id)
                .or_default()
                .push(model.into());
        }

        Ok(groups
            .into_iter()
            .map(|group| {
                let apis = apis_by_group.remove(&group.id).unwrap_or_default();
                GroupWithApis { group, apis }
            })
            .collect())
    }

    /// Find the group best matching a partial name, case-insensitively.
    ///
    /// An exact match wins; otherwise the first substring match in display order.
    pub async fn find_by_name_fuzzy(db: &DatabaseConnection, name: &str) -> AppResult<Option<Group>> {
        let wanted = name.to_lowercase();
        let in_rust = folds_in_rust(db);

        let mut select = GroupEntity::find()
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id);
        if !in_rust {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((GroupEntity, Column::Name))))
                    .like(LikeExpr::new(like_contains_pattern(name)).escape('\\')),
            );
        }
        let candidates: Vec<group::Model> = select
            .all(db)
            .await?
            .into_iter()
            .filter(|g| !in_rust || contains_folded(&g.name, &wanted))
            .collect();

        let exact = candidates
            .iter()
            .position(|g| g.name.to_lowercase() == wanted);

        Ok(match exact {
            Some(idx) => candidates.into_iter().nth(idx),
            None => candidates.into_iter().next(),
        }
        .map(Group::from))
    }

    fn name_conflict(err: sea_orm::DbErr, name: &str) -> AppError {
        match AppError::from(err) {
            AppError::Conflict(_) => AppError::Conflict(format!("Group '{}'", name)),
            other => other,
        }
    }
}

// Conversion from SeaORM model to our domain model
impl From<group::Model> for Group {
    fn from(m: group::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
