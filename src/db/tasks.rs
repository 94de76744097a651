//! Database queries for tasks.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::task::{self, ActiveModel as TaskActiveModel, Entity as Task};
use crate::error::{AppError, AppResult};

/// Represents a task to be inserted.
pub struct NewTask {
    pub team_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Insert a new task.
pub async fn insert<C: ConnectionTrait>(db: &C, new_task: NewTask) -> AppResult<task::Model> {
    let model = TaskActiveModel {
        id: Set(Uuid::now_v7()),
        team_id: Set(new_task.team_id),
        title: Set(new_task.title),
        description: Set(new_task.description),
        created_at: Set(Utc::now()),
    };

    let result = model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert task: {}", e)))?;

    Ok(result)
}

/// Get a single task by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<task::Model>> {
    let result = Task::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get task: {}", e)))?;

    Ok(result)
}

/// List all tasks.
pub async fn list<C: ConnectionTrait>(db: &C) -> AppResult<Vec<task::Model>> {
    let result = Task::find()
        .order_by_asc(task::Column::Id) // UUIDv7 is time-ordered
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list tasks: {}", e)))?;

    Ok(result)
}
