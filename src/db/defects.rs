//! Database queries for defects.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::defect::{self, ActiveModel as DefectActiveModel, Entity as Defect};
use crate::error::{AppError, AppResult};

/// Represents a defect to be inserted.
pub struct NewDefect {
    pub title: String,
    pub description: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub severity: String,
    pub priority_id: Uuid,
    pub reported_at: DateTime<Utc>,
    pub reported_by_team_id: Uuid,
    pub assigned_to_team_id: Option<Uuid>,
    pub test_run_id: Option<Uuid>,
    pub test_case_id: Option<Uuid>,
}

/// Field changes for a defect edit. `None` leaves the field unchanged.
#[derive(Default)]
pub struct DefectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub priority_id: Option<Uuid>,
}

/// Query parameters for defect listings.
#[derive(Debug, Default)]
pub struct QueryDefectsParams {
    pub resolved: Option<bool>,
    pub test_run_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

/// Insert a new defect.
pub async fn insert<C: ConnectionTrait>(db: &C, new_defect: NewDefect) -> AppResult<defect::Model> {
    let now = Utc::now();

    let model = DefectActiveModel {
        id: Set(Uuid::now_v7()),
        title: Set(new_defect.title),
        description: Set(new_defect.description),
        steps_to_reproduce: Set(new_defect.steps_to_reproduce),
        severity: Set(new_defect.severity),
        priority_id: Set(new_defect.priority_id),
        reported_at: Set(new_defect.reported_at),
        resolved_at: Set(None),
        reported_by_team_id: Set(new_defect.reported_by_team_id),
        assigned_to_team_id: Set(new_defect.assigned_to_team_id),
        test_run_id: Set(new_defect.test_run_id),
        test_case_id: Set(new_defect.test_case_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert defect: {}", e)))?;

    Ok(result)
}

/// Get a single defect by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<defect::Model>> {
    let result = Defect::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get defect: {}", e)))?;

    Ok(result)
}

/// Find an unresolved defect referencing a (run, case) pair.
pub async fn find_open_by_pair<C: ConnectionTrait>(
    db: &C,
    test_run_id: Uuid,
    test_case_id: Uuid,
) -> AppResult<Option<defect::Model>> {
    let result = Defect::find()
        .filter(defect::Column::TestRunId.eq(test_run_id))
        .filter(defect::Column::TestCaseId.eq(test_case_id))
        .filter(defect::Column::ResolvedAt.is_null())
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to look up open defect: {}", e)))?;

    Ok(result)
}

/// Query defects with filtering and pagination.
pub async fn query<C: ConnectionTrait>(
    db: &C,
    params: &QueryDefectsParams,
) -> AppResult<(Vec<defect::Model>, u64)> {
    let mut select = Defect::find();

    if let Some(resolved) = params.resolved {
        select = if resolved {
            select.filter(defect::Column::ResolvedAt.is_not_null())
        } else {
            select.filter(defect::Column::ResolvedAt.is_null())
        };
    }

    if let Some(test_run_id) = params.test_run_id {
        select = select.filter(defect::Column::TestRunId.eq(test_run_id));
    }

    // Count total before pagination
    let total = select
        .clone()
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count defects: {}", e)))?;

    // Apply pagination
    let limit = params.limit.clamp(1, 100) as u64;
    let offset = params.offset.max(0) as u64;

    let defects = select
        .order_by_desc(defect::Column::ReportedAt)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to query defects: {}", e)))?;

    Ok((defects, total))
}

/// Apply field changes to an existing defect.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    existing: defect::Model,
    changes: DefectUpdate,
) -> AppResult<defect::Model> {
    let mut model: DefectActiveModel = existing.into();

    if let Some(title) = changes.title {
        model.title = Set(title);
    }
    if let Some(description) = changes.description {
        model.description = Set(Some(description));
    }
    if let Some(severity) = changes.severity {
        model.severity = Set(severity);
    }
    if let Some(priority_id) = changes.priority_id {
        model.priority_id = Set(priority_id);
    }
    model.updated_at = Set(Utc::now());

    let result = model
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update defect: {}", e)))?;

    Ok(result)
}

/// Mark a defect resolved, applying optional field overrides.
pub async fn mark_resolved<C: ConnectionTrait>(
    db: &C,
    existing: defect::Model,
    steps_to_reproduce: Option<String>,
    severity: Option<String>,
    assigned_to_team_id: Option<Uuid>,
    resolved_at: DateTime<Utc>,
) -> AppResult<defect::Model> {
    let mut model: DefectActiveModel = existing.into();

    if let Some(steps) = steps_to_reproduce {
        model.steps_to_reproduce = Set(Some(steps));
    }
    if let Some(severity) = severity {
        model.severity = Set(severity);
    }
    if let Some(team_id) = assigned_to_team_id {
        model.assigned_to_team_id = Set(Some(team_id));
    }
    model.resolved_at = Set(Some(resolved_at));
    model.updated_at = Set(Utc::now());

    let result = model
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to resolve defect: {}", e)))?;

    Ok(result)
}

/// Hard-delete a defect. Callers must enforce the execution-link guard first.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    Defect::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to delete defect: {}", e)))?;

    Ok(())
}
