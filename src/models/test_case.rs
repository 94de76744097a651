//! Test case request/response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_case;
use crate::models::short_id;

/// Request to create a test case.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestCaseRequest {
    pub task_id: Uuid,
    /// Authoring team.
    pub team_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    /// Catalog id for the case type.
    pub case_type_id: Option<Uuid>,
    /// Catalog id within TestCaseStatus; defaults to Draft.
    pub status_id: Option<Uuid>,
}

/// Request to edit a test case. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestCaseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub case_type_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
}

/// Response for a test case.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestCaseResponse {
    pub id: Uuid,
    /// Short ID for display (timestamp portion of UUIDv7).
    pub short_id: String,
    pub task_id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub case_type_id: Option<Uuid>,
    pub status_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_case::Model> for TestCaseResponse {
    fn from(model: test_case::Model) -> Self {
        Self {
            short_id: short_id(&model.id),
            id: model.id,
            task_id: model.task_id,
            team_id: model.team_id,
            title: model.title,
            description: model.description,
            steps: model.steps,
            expected_result: model.expected_result,
            case_type_id: model.case_type_id,
            status_id: model.status_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Test case list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestCaseListResponse {
    pub test_cases: Vec<TestCaseResponse>,
}
