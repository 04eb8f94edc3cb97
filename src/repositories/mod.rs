pub mod api;
pub mod group;
pub mod parameter;

pub use api::ApiRepository;
pub use group::GroupRepository;
pub use parameter::ParameterRepository;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend};

use crate::error::AppResult;

/// Base repository trait for common CRUD operations
#[async_trait]
pub trait Repository<T>
where
    T: Send + Sync,
{
    /// Find entity by ID
    async fn find_by_id(db: &DatabaseConnection, id: i32) -> AppResult<T>;

    /// Delete entity by ID (dependent rows cascade)
    async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<()>;
}

/// SQLite's `LOWER()` folds ASCII only, so on SQLite case-insensitive
/// matching runs in Rust over the ordered rows instead of in a LIKE.
pub(crate) fn folds_in_rust(db: &DatabaseConnection) -> bool {
    db.get_database_backend() == DbBackend::Sqlite
}

/// Unicode case-insensitive substring test; `needle` must already be lowercase.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Escape `%`, `_` and `\` so user text matches literally inside a LIKE pattern.
pub(crate) fn like_contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
