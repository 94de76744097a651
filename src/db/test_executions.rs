//! Database queries for test executions.
//!
//! The insert path maps a unique-constraint violation on the (run, case)
//! pair to `AppError::Conflict` so the recorder can fall back to re-reading
//! the row a concurrent submission created.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::entity::test_execution::{
    self, ActiveModel as TestExecutionActiveModel, Entity as TestExecution,
};
use crate::error::{AppError, AppResult};

/// Represents a test execution to be inserted.
pub struct NewTestExecution {
    pub test_run_id: Uuid,
    pub test_case_id: Uuid,
    pub actual_result: String,
    pub status_id: Uuid,
    pub executing_team_id: Uuid,
    pub executed_at: DateTime<Utc>,
    pub retries: i32,
}

/// Insert a new test execution.
///
/// Returns `AppError::Conflict` when the (run, case) pair already exists.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    execution: NewTestExecution,
) -> AppResult<test_execution::Model> {
    let model = TestExecutionActiveModel {
        id: Set(Uuid::now_v7()),
        test_run_id: Set(execution.test_run_id),
        test_case_id: Set(execution.test_case_id),
        actual_result: Set(execution.actual_result),
        status_id: Set(execution.status_id),
        executing_team_id: Set(execution.executing_team_id),
        executed_at: Set(execution.executed_at),
        retries: Set(execution.retries),
        created_at: Set(Utc::now()),
    };

    let result = model.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
            "An execution already exists for this test run and test case".to_string(),
        ),
        _ => AppError::Database(format!("Failed to insert test execution: {}", e)),
    })?;

    Ok(result)
}

/// Get the single execution for a (run, case) pair.
pub async fn find_by_pair<C: ConnectionTrait>(
    db: &C,
    test_run_id: Uuid,
    test_case_id: Uuid,
) -> AppResult<Option<test_execution::Model>> {
    let result = TestExecution::find()
        .filter(test_execution::Column::TestRunId.eq(test_run_id))
        .filter(test_execution::Column::TestCaseId.eq(test_case_id))
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get test execution: {}", e)))?;

    Ok(result)
}

/// Overwrite an execution with a newly submitted result.
pub async fn update_result<C: ConnectionTrait>(
    db: &C,
    existing: test_execution::Model,
    actual_result: String,
    status_id: Uuid,
    executing_team_id: Uuid,
    executed_at: DateTime<Utc>,
    retries: i32,
) -> AppResult<test_execution::Model> {
    let mut model: TestExecutionActiveModel = existing.into();
    model.actual_result = Set(actual_result);
    model.status_id = Set(status_id);
    model.executing_team_id = Set(executing_team_id);
    model.executed_at = Set(executed_at);
    model.retries = Set(retries);

    let result = model
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update test execution: {}", e)))?;

    Ok(result)
}

/// Overwrite only the status of an execution (the retest reset).
pub async fn update_status<C: ConnectionTrait>(
    db: &C,
    existing: test_execution::Model,
    status_id: Uuid,
) -> AppResult<test_execution::Model> {
    let mut model: TestExecutionActiveModel = existing.into();
    model.status_id = Set(status_id);

    let result = model
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update execution status: {}", e)))?;

    Ok(result)
}

/// Get the executions recorded against a run, most recent first.
pub async fn list_by_run<C: ConnectionTrait>(
    db: &C,
    test_run_id: Uuid,
) -> AppResult<Vec<test_execution::Model>> {
    let result = TestExecution::find()
        .filter(test_execution::Column::TestRunId.eq(test_run_id))
        .order_by_desc(test_execution::Column::ExecutedAt)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list test executions: {}", e)))?;

    Ok(result)
}

/// Count executions referencing a test case (the deletion guard).
pub async fn count_by_case<C: ConnectionTrait>(db: &C, test_case_id: Uuid) -> AppResult<u64> {
    let count = TestExecution::find()
        .filter(test_execution::Column::TestCaseId.eq(test_case_id))
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count test executions: {}", e)))?;

    Ok(count)
}
