//! Test run request/response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_run;
use crate::models::short_id;

/// Request to create a test run.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestRunRequest {
    pub task_id: Uuid,
    pub name: String,
    /// Creating team.
    pub team_id: Uuid,
    /// Defaults to the creating team.
    pub executing_team_id: Option<Uuid>,
    /// Clamped to now when a future date is supplied; defaults to now.
    pub run_date: Option<DateTime<Utc>>,
    /// Catalog id within TestRunStatus; defaults to Planned.
    pub status_id: Option<Uuid>,
}

/// Response for a test run.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestRunResponse {
    pub id: Uuid,
    /// Short ID for display (timestamp portion of UUIDv7).
    pub short_id: String,
    pub task_id: Uuid,
    pub name: String,
    pub created_by_team_id: Uuid,
    pub executing_team_id: Uuid,
    pub run_date: DateTime<Utc>,
    pub status_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<test_run::Model> for TestRunResponse {
    fn from(model: test_run::Model) -> Self {
        Self {
            short_id: short_id(&model.id),
            id: model.id,
            task_id: model.task_id,
            name: model.name,
            created_by_team_id: model.created_by_team_id,
            executing_team_id: model.executing_team_id,
            run_date: model.run_date,
            status_id: model.status_id,
            created_at: model.created_at,
        }
    }
}

/// Test run list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestRunListResponse {
    pub test_runs: Vec<TestRunResponse>,
}
