//! Defect request/response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::defect;
use crate::models::short_id;

/// Request to manually file a defect.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDefectRequest {
    pub title: String,
    pub description: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub severity: Option<String>,
    /// Catalog id within Priority.
    pub priority_id: Uuid,
    /// Reporting team.
    pub team_id: Uuid,
    /// Optional execution back-link; both or neither.
    pub test_run_id: Option<Uuid>,
    pub test_case_id: Option<Uuid>,
}

/// Request to edit a defect. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDefectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub priority_id: Option<Uuid>,
}

/// Request to resolve a defect.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResolveDefectRequest {
    pub steps_to_reproduce: Option<String>,
    pub severity: Option<String>,
}

/// Response for a defect.
#[derive(Debug, Serialize, ToSchema)]
pub struct DefectResponse {
    pub id: Uuid,
    /// Short ID for display (timestamp portion of UUIDv7).
    pub short_id: String,
    pub title: String,
    pub description: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub severity: String,
    pub priority_id: Uuid,
    pub reported_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub reported_by_team_id: Uuid,
    pub assigned_to_team_id: Option<Uuid>,
    pub test_run_id: Option<Uuid>,
    pub test_case_id: Option<Uuid>,
}

impl From<defect::Model> for DefectResponse {
    fn from(model: defect::Model) -> Self {
        Self {
            short_id: short_id(&model.id),
            id: model.id,
            title: model.title,
            description: model.description,
            steps_to_reproduce: model.steps_to_reproduce,
            severity: model.severity,
            priority_id: model.priority_id,
            reported_at: model.reported_at,
            resolved_at: model.resolved_at,
            reported_by_team_id: model.reported_by_team_id,
            assigned_to_team_id: model.assigned_to_team_id,
            test_run_id: model.test_run_id,
            test_case_id: model.test_case_id,
        }
    }
}

/// Paginated defect list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct DefectListResponse {
    pub defects: Vec<DefectResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
