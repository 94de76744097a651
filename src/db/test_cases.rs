//! Database queries for test cases.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::test_case::{self, ActiveModel as TestCaseActiveModel, Entity as TestCase};
use crate::error::{AppError, AppResult};

/// Represents a test case to be inserted.
pub struct NewTestCase {
    pub task_id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub case_type_id: Option<Uuid>,
    pub status_id: Uuid,
}

/// Field changes for a test case edit. `None` leaves the field unchanged.
#[derive(Default)]
pub struct TestCaseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub case_type_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
}

/// Insert a new test case.
pub async fn insert<C: ConnectionTrait>(db: &C, test_case: NewTestCase) -> AppResult<test_case::Model> {
    let now = Utc::now();

    let model = TestCaseActiveModel {
        id: Set(Uuid::now_v7()),
        task_id: Set(test_case.task_id),
        team_id: Set(test_case.team_id),
        title: Set(test_case.title),
        description: Set(test_case.description),
        steps: Set(test_case.steps),
        expected_result: Set(test_case.expected_result),
        case_type_id: Set(test_case.case_type_id),
        status_id: Set(test_case.status_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))?;

    Ok(result)
}

/// Get a single test case by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<test_case::Model>> {
    let result = TestCase::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get test case: {}", e)))?;

    Ok(result)
}

/// Get test cases by task ID.
pub async fn list_by_task<C: ConnectionTrait>(db: &C, task_id: Uuid) -> AppResult<Vec<test_case::Model>> {
    let result = TestCase::find()
        .filter(test_case::Column::TaskId.eq(task_id))
        .order_by_asc(test_case::Column::Id) // UUIDv7 is time-ordered
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get test cases: {}", e)))?;

    Ok(result)
}

/// Apply field changes to an existing test case.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    existing: test_case::Model,
    changes: TestCaseUpdate,
) -> AppResult<test_case::Model> {
    let mut model: TestCaseActiveModel = existing.into();

    if let Some(title) = changes.title {
        model.title = Set(title);
    }
    if let Some(description) = changes.description {
        model.description = Set(Some(description));
    }
    if let Some(steps) = changes.steps {
        model.steps = Set(Some(steps));
    }
    if let Some(expected_result) = changes.expected_result {
        model.expected_result = Set(Some(expected_result));
    }
    if let Some(case_type_id) = changes.case_type_id {
        model.case_type_id = Set(Some(case_type_id));
    }
    if let Some(status_id) = changes.status_id {
        model.status_id = Set(status_id);
    }
    model.updated_at = Set(Utc::now());

    let result = model
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update test case: {}", e)))?;

    Ok(result)
}

/// Hard-delete a test case. Callers must enforce the orphan guard first.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    TestCase::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to delete test case: {}", e)))?;

    Ok(())
}
