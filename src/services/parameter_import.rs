use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{Direction, NewParameter};
use crate::repositories::ParameterRepository;
use crate::services::converter::derive_parameters;

/// Outcome of a partition replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows written, nested ones included
    pub count: usize,
    /// Top-level keys of the source JSON; zero for structured imports
    pub parameter_count: usize,
}

/// Replaces the parameters of one (API, direction) partition.
///
/// Each call runs in its own transaction that locks the API row first, so
/// writers to the same API queue up and readers never see a half-written
/// partition.
pub struct ParameterImporter;

impl ParameterImporter {
    /// Replace a partition with an explicit parameter forest.
    pub async fn replace_structured(
        db: &DatabaseConnection,
        api_id: i32,
        direction: &str,
        parameters: &[NewParameter],
    ) -> AppResult<ImportSummary> {
        let direction: Direction = direction.parse()?;
        validate_names(parameters)?;

        let txn = db.begin().await?;
        ParameterRepository::lock_api(&txn, api_id).await?;
        let removed = ParameterRepository::delete_partition(&txn, api_id, direction).await?;
        let count = ParameterRepository::insert_forest(&txn, api_id, direction, parameters).await?;
        txn.commit().await?;

        tracing::info!(api_id, direction = %direction, removed, inserted = count, "Parameters replaced");
        Ok(ImportSummary {
            count,
            parameter_count: 0,
        })
    }

    /// Replace a partition with parameters derived from example JSON.
    ///
    /// The old rows are read for metadata before they are deleted, inside the
    /// same transaction.
    pub async fn replace_from_json(
        db: &DatabaseConnection,
        api_id: i32,
        direction: &str,
        json: &Value,
    ) -> AppResult<ImportSummary> {
        let direction: Direction = direction.parse()?;
        let parameter_count = json
            .as_object()
            .map(|o| o.len())
            .ok_or_else(|| AppError::Validation("Invalid json object".to_string()))?;

        let txn = db.begin().await?;
        ParameterRepository::lock_api(&txn, api_id).await?;
        let existing = ParameterRepository::list_partition(&txn, api_id, direction).await?;
        let forest = derive_parameters(json, &existing)?;
        ParameterRepository::delete_partition(&txn, api_id, direction).await?;
        let count = ParameterRepository::insert_forest(&txn, api_id, direction, &forest).await?;
        txn.commit().await?;

        tracing::info!(
            api_id,
            direction = %direction,
            previous = existing.len(),
            inserted = count,
            "Parameters regenerated from JSON"
        );
        Ok(ImportSummary {
            count,
            parameter_count,
        })
    }
}

fn validate_names(parameters: &[NewParameter]) -> AppResult<()> {
    let mut stack: Vec<&NewParameter> = parameters.iter().collect();
    while let Some(param) = stack.pop() {
        if param.name.trim().is_empty() {
            return Err(AppError::Validation(
                "Parameter name cannot be empty".to_string(),
            ));
        }
        stack.extend(param.children.iter());
    }
    Ok(())
}
