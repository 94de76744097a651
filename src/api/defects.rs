//! Defect API handlers.
//!
//! Resolution goes through the workflow service (it reopens the originating
//! execution); the remaining CRUD operations validate inline and write
//! directly, matching their single-row footprint.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{self, ActorAuth};
use crate::db::defects::{DefectUpdate, NewDefect, QueryDefectsParams};
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::defect::{
    CreateDefectRequest, DefectListResponse, DefectResponse, ResolveDefectRequest,
    UpdateDefectRequest,
};
use crate::models::{Role, StatusCategory};
use crate::services::defect::{self, ResolveDefect};
use crate::services::StatusCatalog;

/// Query parameters for the defect listing endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryDefectsQuery {
    /// Filter on resolution state.
    pub resolved: Option<bool>,
    /// Filter by test run ID.
    pub test_run_id: Option<Uuid>,
    /// Results per page (default 20, max 100).
    pub limit: Option<i64>,
    /// Pagination offset.
    pub offset: Option<i64>,
}

/// Configure defect routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_defect)
        .service(query_defects)
        .service(get_defect)
        .service(update_defect)
        .service(resolve_defect)
        .service(delete_defect);
}

/// Manually file a defect.
///
/// Used when no execution exists to file one automatically; the run/case
/// back-link is optional but must be supplied as a pair.
///
/// POST /api/v1/defects
#[utoipa::path(
    post,
    path = "/api/v1/defects",
    tag = "Defects",
    request_body = CreateDefectRequest,
    responses(
        (status = 201, description = "Defect created", body = DefectResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "QA or Tester role required")
    ),
    security(("actor_token" = []))
)]
#[post("/defects")]
pub async fn create_defect(
    auth: ActorAuth,
    body: web::Json<CreateDefectRequest>,
    pool: web::Data<DbPool>,
    catalog: web::Data<StatusCatalog>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Qa, Role::Tester])?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }

    if !catalog.contains(StatusCategory::Priority, body.priority_id) {
        return Err(AppError::InvalidStatus(format!(
            "Priority id {} does not resolve to a priority",
            body.priority_id
        )));
    }

    db::teams::find_by_id(pool.connection(), body.team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team".to_string()))?;

    let pair = match (body.test_run_id, body.test_case_id) {
        (Some(run_id), Some(case_id)) => {
            db::test_runs::find_by_id(pool.connection(), run_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Test run".to_string()))?;
            db::test_cases::find_by_id(pool.connection(), case_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Test case".to_string()))?;
            (Some(run_id), Some(case_id))
        }
        (None, None) => (None, None),
        _ => {
            return Err(AppError::InvalidInput(
                "test_run_id and test_case_id must be supplied together".to_string(),
            ));
        }
    };

    let created = db::defects::insert(
        pool.connection(),
        NewDefect {
            title: title.to_string(),
            description: body.description.clone(),
            steps_to_reproduce: body.steps_to_reproduce.clone(),
            severity: body
                .severity
                .clone()
                .unwrap_or_else(|| "Unspecified".to_string()),
            priority_id: body.priority_id,
            reported_at: chrono::Utc::now(),
            reported_by_team_id: body.team_id,
            assigned_to_team_id: None,
            test_run_id: pair.0,
            test_case_id: pair.1,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(DefectResponse::from(created)))
}

/// Query defects with filtering and pagination.
///
/// GET /api/v1/defects
#[utoipa::path(
    get,
    path = "/api/v1/defects",
    tag = "Defects",
    params(
        ("resolved" = Option<bool>, Query, description = "Filter on resolution state"),
        ("test_run_id" = Option<Uuid>, Query, description = "Filter by test run ID"),
        ("limit" = Option<i64>, Query, description = "Results per page (default 20, max 100)"),
        ("offset" = Option<i64>, Query, description = "Pagination offset")
    ),
    responses(
        (status = 200, description = "List of defects", body = DefectListResponse)
    )
)]
#[get("/defects")]
pub async fn query_defects(
    pool: web::Data<DbPool>,
    query: web::Query<QueryDefectsQuery>,
) -> AppResult<HttpResponse> {
    let params = QueryDefectsParams {
        resolved: query.resolved,
        test_run_id: query.test_run_id,
        limit: query.limit.unwrap_or(20),
        offset: query.offset.unwrap_or(0),
    };

    let (defects, total) = db::defects::query(pool.connection(), &params).await?;

    Ok(HttpResponse::Ok().json(DefectListResponse {
        defects: defects.into_iter().map(DefectResponse::from).collect(),
        total: total as i64,
        limit: params.limit,
        offset: params.offset,
    }))
}

/// Get a single defect.
///
/// GET /api/v1/defects/{id}
#[utoipa::path(
    get,
    path = "/api/v1/defects/{id}",
    tag = "Defects",
    params(("id" = Uuid, Path, description = "Defect UUID")),
    responses(
        (status = 200, description = "The defect", body = DefectResponse),
        (status = 404, description = "Defect not found")
    )
)]
#[get("/defects/{id}")]
pub async fn get_defect(path: web::Path<Uuid>, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let defect = db::defects::find_by_id(pool.connection(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Defect".to_string()))?;

    Ok(HttpResponse::Ok().json(DefectResponse::from(defect)))
}

/// Edit a defect.
///
/// PUT /api/v1/defects/{id}
#[utoipa::path(
    put,
    path = "/api/v1/defects/{id}",
    tag = "Defects",
    params(("id" = Uuid, Path, description = "Defect UUID")),
    request_body = UpdateDefectRequest,
    responses(
        (status = 200, description = "Defect updated", body = DefectResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "QA or Tester role required"),
        (status = 404, description = "Defect not found")
    ),
    security(("actor_token" = []))
)]
#[put("/defects/{id}")]
pub async fn update_defect(
    auth: ActorAuth,
    path: web::Path<Uuid>,
    body: web::Json<UpdateDefectRequest>,
    pool: web::Data<DbPool>,
    catalog: web::Data<StatusCatalog>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Qa, Role::Tester])?;

    if let Some(priority_id) = body.priority_id
        && !catalog.contains(StatusCategory::Priority, priority_id)
    {
        return Err(AppError::InvalidStatus(format!(
            "Priority id {} does not resolve to a priority",
            priority_id
        )));
    }

    let existing = db::defects::find_by_id(pool.connection(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Defect".to_string()))?;

    let updated = db::defects::update(
        pool.connection(),
        existing,
        DefectUpdate {
            title: body.title.clone(),
            description: body.description.clone(),
            severity: body.severity.clone(),
            priority_id: body.priority_id,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(DefectResponse::from(updated)))
}

/// Resolve a defect.
///
/// Sets the resolution timestamp and resets the originating execution, if
/// any, to Retest - both in one unit of work.
///
/// POST /api/v1/defects/{id}/resolve
#[utoipa::path(
    post,
    path = "/api/v1/defects/{id}/resolve",
    tag = "Defects",
    params(("id" = Uuid, Path, description = "Defect UUID")),
    request_body = ResolveDefectRequest,
    responses(
        (status = 200, description = "Defect resolved", body = DefectResponse),
        (status = 403, description = "Tester role required"),
        (status = 404, description = "Defect not found")
    ),
    security(("actor_token" = []))
)]
#[post("/defects/{id}/resolve")]
pub async fn resolve_defect(
    auth: ActorAuth,
    path: web::Path<Uuid>,
    body: web::Json<ResolveDefectRequest>,
    pool: web::Data<DbPool>,
    catalog: web::Data<StatusCatalog>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();

    let outcome = defect::resolve_defect(
        pool.get_ref(),
        catalog.get_ref(),
        &auth.actor,
        path.into_inner(),
        ResolveDefect {
            steps_to_reproduce: request.steps_to_reproduce,
            severity: request.severity,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(DefectResponse::from(outcome.defect)))
}

/// Delete a defect.
///
/// Only permitted for defects with no linked test case, guarding the
/// execution history of auto-filed defects.
///
/// DELETE /api/v1/defects/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/defects/{id}",
    tag = "Defects",
    params(("id" = Uuid, Path, description = "Defect UUID")),
    responses(
        (status = 204, description = "Defect deleted"),
        (status = 400, description = "Defect is linked to an execution"),
        (status = 403, description = "QA or Tester role required"),
        (status = 404, description = "Defect not found")
    ),
    security(("actor_token" = []))
)]
#[delete("/defects/{id}")]
pub async fn delete_defect(
    auth: ActorAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Qa, Role::Tester])?;

    let existing = db::defects::find_by_id(pool.connection(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Defect".to_string()))?;

    if existing.test_case_id.is_some() {
        return Err(AppError::InvalidInput(
            "Defect is linked to a test case execution and cannot be deleted".to_string(),
        ));
    }

    db::defects::delete(pool.connection(), existing.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
