//! Database queries for the status catalog.

use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};

use crate::entity::status_code::{self, Entity as StatusCode};
use crate::error::{AppError, AppResult};

/// List every seeded status code. The catalog service loads this once at
/// startup; nothing mutates the table afterwards.
pub async fn list_all<C: ConnectionTrait>(db: &C) -> AppResult<Vec<status_code::Model>> {
    let rows = StatusCode::find()
        .order_by_asc(status_code::Column::Category)
        .order_by_asc(status_code::Column::Name)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list status codes: {}", e)))?;

    Ok(rows)
}
