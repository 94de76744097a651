//! Test execution request/response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_execution;
use crate::models::short_id;

/// Request to submit an execution result for a (run, case) pair.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitResultRequest {
    /// Observed outcome text.
    pub actual_result: String,
    /// Catalog id within TestCaseStatus.
    pub status_id: Uuid,
    /// Defaults to the run's executing team.
    pub executing_team_id: Option<Uuid>,
    /// Retry counter; preserved when omitted.
    pub retries: Option<i32>,
}

/// Response for a test execution.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExecutionResponse {
    pub id: Uuid,
    /// Short ID for display (timestamp portion of UUIDv7).
    pub short_id: String,
    pub test_run_id: Uuid,
    pub test_case_id: Uuid,
    pub actual_result: String,
    pub status_id: Uuid,
    pub executing_team_id: Uuid,
    pub executed_at: DateTime<Utc>,
    pub retries: i32,
}

impl From<test_execution::Model> for ExecutionResponse {
    fn from(model: test_execution::Model) -> Self {
        Self {
            short_id: short_id(&model.id),
            id: model.id,
            test_run_id: model.test_run_id,
            test_case_id: model.test_case_id,
            actual_result: model.actual_result,
            status_id: model.status_id,
            executing_team_id: model.executing_team_id,
            executed_at: model.executed_at,
            retries: model.retries,
        }
    }
}

/// Response for a recorded submission: the upserted execution plus the defect
/// automatically filed for it, if any.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResultResponse {
    pub execution: ExecutionResponse,
    pub filed_defect_id: Option<Uuid>,
}

/// Execution history response for a run, most recent first.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExecutionListResponse {
    pub executions: Vec<ExecutionResponse>,
}
