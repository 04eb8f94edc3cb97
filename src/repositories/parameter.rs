use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::api::{self, Entity as ApiEntity};
use crate::entity::parameter::{self, ActiveModel, Column, Entity as ParameterEntity};
use crate::error::{AppError, AppResult};
use crate::models::{Direction, NewParameter, ParamKind, Parameter};

/// Parameter repository. Every function takes any connection so the
/// partition replacement can run them inside one transaction.
pub struct ParameterRepository;

impl ParameterRepository {
    /// All parameters of an API, both directions, in sibling order
    pub async fn list_by_api<C: ConnectionTrait>(conn: &C, api_id: i32) -> AppResult<Vec<Parameter>> {
        let models = ParameterEntity::find()
            .filter(Column::ApiId.eq(api_id))
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .all(conn)
            .await?;

        models.into_iter().map(Parameter::try_from).collect()
    }

    /// Flat rows of one (API, direction) partition
    pub async fn list_partition<C: ConnectionTrait>(
        conn: &C,
        api_id: i32,
        direction: Direction,
    ) -> AppResult<Vec<Parameter>> {
        let models = ParameterEntity::find()
            .filter(Column::ApiId.eq(api_id))
            .filter(Column::Direction.eq(direction.as_str()))
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .all(conn)
            .await?;

        models.into_iter().map(Parameter::try_from).collect()
    }

    /// Take the write lock on the owning API as the first statement of the
    /// transaction, touching its `updated_at`.
    ///
    /// This is a row lock on PostgreSQL and the database write lock on SQLite.
    /// Either way later writers wait here, before they have read anything.
    pub async fn lock_api<C: ConnectionTrait>(conn: &C, api_id: i32) -> AppResult<()> {
        let result = ApiEntity::update_many()
            .col_expr(api::Column::UpdatedAt, Expr::value(time::OffsetDateTime::now_utc()))
            .filter(api::Column::Id.eq(api_id))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("API".to_string()));
        }
        Ok(())
    }

    /// Remove every row of one partition, returning the number removed
    pub async fn delete_partition<C: ConnectionTrait>(
        conn: &C,
        api_id: i32,
        direction: Direction,
    ) -> AppResult<u64> {
        let result = ParameterEntity::delete_many()
            .filter(Column::ApiId.eq(api_id))
            .filter(Column::Direction.eq(direction.as_str()))
            .exec(conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Insert a parameter forest in pre-order.
    ///
    /// A node is written before any of its children so each child can record
    /// the parent's generated id. `order` comes from one counter shared by the
    /// whole forest, starting at 0.
    pub async fn insert_forest<C: ConnectionTrait>(
        conn: &C,
        api_id: i32,
        direction: Direction,
        forest: &[NewParameter],
    ) -> AppResult<usize> {
        let now = time::OffsetDateTime::now_utc();
        let mut order: i32 = 0;
        let mut stack: Vec<(&NewParameter, Option<i32>)> =
            forest.iter().rev().map(|node| (node, None)).collect();

        while let Some((node, parent_id)) = stack.pop() {
            let model = ActiveModel {
                api_id: Set(api_id),
                parent_id: Set(parent_id),
                name: Set(node.name.clone()),
                param_type: Set(node.param_type.as_str().to_string()),
                description: Set(node.description.clone()),
                required: Set(node.required),
                direction: Set(direction.as_str().to_string()),
                sort_order: Set(order),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            let inserted = model.insert(conn).await?;
            order += 1;

            stack.extend(node.children.iter().rev().map(|child| (child, Some(inserted.id))));
        }

        tracing::debug!(api_id, direction = %direction, inserted = order, "Parameters inserted");
        Ok(order as usize)
    }
}

// Conversion from SeaORM model to our domain model
impl TryFrom<parameter::Model> for Parameter {
    type Error = AppError;

    fn try_from(m: parameter::Model) -> Result<Self, Self::Error> {
        let direction = m.direction.parse::<Direction>().map_err(|_| {
            AppError::Integrity(format!(
                "parameter {} has unknown direction '{}'",
                m.id, m.direction
            ))
        })?;

        Ok(Self {
            id: m.id,
            api_id: m.api_id,
            parent_id: m.parent_id,
            name: m.name,
            param_type: ParamKind::from(m.param_type),
            description: m.description,
            required: m.required,
            direction,
            order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
            children: Vec::new(),
        })
    }
}
