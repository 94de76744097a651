//! Database queries for test runs.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::test_run::{self, ActiveModel as TestRunActiveModel, Entity as TestRun};
use crate::error::{AppError, AppResult};

/// Represents a test run to be inserted.
pub struct NewTestRun {
    pub task_id: Uuid,
    pub name: String,
    pub created_by_team_id: Uuid,
    pub executing_team_id: Uuid,
    pub run_date: chrono::DateTime<Utc>,
    pub status_id: Uuid,
}

/// Insert a new test run.
pub async fn insert<C: ConnectionTrait>(db: &C, run: NewTestRun) -> AppResult<test_run::Model> {
    let model = TestRunActiveModel {
        id: Set(Uuid::now_v7()),
        task_id: Set(run.task_id),
        name: Set(run.name),
        created_by_team_id: Set(run.created_by_team_id),
        executing_team_id: Set(run.executing_team_id),
        run_date: Set(run.run_date),
        status_id: Set(run.status_id),
        created_at: Set(Utc::now()),
    };

    let result = model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert test run: {}", e)))?;

    Ok(result)
}

/// Get a single test run by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<test_run::Model>> {
    let result = TestRun::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))?;

    Ok(result)
}

/// Get test runs by task ID.
pub async fn list_by_task<C: ConnectionTrait>(db: &C, task_id: Uuid) -> AppResult<Vec<test_run::Model>> {
    let result = TestRun::find()
        .filter(test_run::Column::TaskId.eq(task_id))
        .order_by_asc(test_run::Column::Id) // UUIDv7 is time-ordered
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get test runs: {}", e)))?;

    Ok(result)
}
