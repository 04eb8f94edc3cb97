use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

use crate::config::Config;
use crate::entity::parameter;
use crate::entity::prelude::{ApiEntity, GroupEntity, ParameterEntity};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// SeaORM database connection
    pub db: DatabaseConnection,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState by connecting to the database and creating
    /// any missing tables
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(config.db_max_connections)
            .sqlx_logging(config.db_logging);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Database(e.to_string()))?;

        create_missing_tables(&db)
            .await
            .map_err(|e| AppStateError::Schema(e.to_string()))?;

        Ok(Self { db, config })
    }
}

/// Create tables and indexes from the entity definitions. Existing ones are
/// left as they are.
pub async fn create_missing_tables(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Parents first so foreign keys resolve
    create_table(db, &schema, GroupEntity).await?;
    create_table(db, &schema, ApiEntity).await?;
    create_table(db, &schema, ParameterEntity).await?;

    // Partition reads filter on (api, direction) and sort by order
    let partition_index = Index::create()
        .name("idx-parameters-partition")
        .table(ParameterEntity)
        .col(parameter::Column::ApiId)
        .col(parameter::Column::Direction)
        .col(parameter::Column::SortOrder)
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&partition_index)).await?;

    tracing::info!("Database schema ready");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<(), sea_orm::DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Database connection error: {0}")]
    Database(String),

    #[error("Schema setup error: {0}")]
    Schema(String),
}
