//! Test run API handlers.

use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{self, ActorAuth};
use crate::db::test_runs::NewTestRun;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::test_run::{CreateTestRunRequest, TestRunListResponse, TestRunResponse};
use crate::models::{Role, StatusCategory};
use crate::services::StatusCatalog;
use crate::services::catalog::names;

/// Configure test run routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_test_run)
        .service(get_test_run)
        .service(get_task_test_runs);
}

/// Create a test run.
///
/// The executing team defaults to the creating team, and a run date in the
/// future is clamped to now.
///
/// POST /api/v1/test-runs
#[utoipa::path(
    post,
    path = "/api/v1/test-runs",
    tag = "Test Runs",
    request_body = CreateTestRunRequest,
    responses(
        (status = 201, description = "Test run created", body = TestRunResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "QA role required"),
        (status = 404, description = "Task or team not found")
    ),
    security(("actor_token" = []))
)]
#[post("/test-runs")]
pub async fn create_test_run(
    auth: ActorAuth,
    body: web::Json<CreateTestRunRequest>,
    pool: web::Data<DbPool>,
    catalog: web::Data<StatusCatalog>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Qa])?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("name is required".to_string()));
    }

    db::tasks::find_by_id(pool.connection(), body.task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

    db::teams::find_by_id(pool.connection(), body.team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team".to_string()))?;

    let executing_team_id = match body.executing_team_id {
        Some(team_id) if team_id != body.team_id => {
            db::teams::find_by_id(pool.connection(), team_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Executing team".to_string()))?;
            team_id
        }
        Some(team_id) => team_id,
        None => body.team_id,
    };

    let status_id = match body.status_id {
        Some(status_id) => {
            if !catalog.contains(StatusCategory::TestRunStatus, status_id) {
                return Err(AppError::InvalidStatus(format!(
                    "Status id {} does not resolve to a test run status",
                    status_id
                )));
            }
            status_id
        }
        None => catalog.require(StatusCategory::TestRunStatus, names::PLANNED)?,
    };

    // Future run dates are clamped to now
    let now = Utc::now();
    let run_date = body.run_date.map_or(now, |date| date.min(now));

    let created = db::test_runs::insert(
        pool.connection(),
        NewTestRun {
            task_id: body.task_id,
            name: name.to_string(),
            created_by_team_id: body.team_id,
            executing_team_id,
            run_date,
            status_id,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(TestRunResponse::from(created)))
}

/// Get a single test run.
///
/// GET /api/v1/test-runs/{id}
#[utoipa::path(
    get,
    path = "/api/v1/test-runs/{id}",
    tag = "Test Runs",
    params(("id" = Uuid, Path, description = "Test run UUID")),
    responses(
        (status = 200, description = "The test run", body = TestRunResponse),
        (status = 404, description = "Test run not found")
    )
)]
#[get("/test-runs/{id}")]
pub async fn get_test_run(
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let test_run = db::test_runs::find_by_id(pool.connection(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Test run".to_string()))?;

    Ok(HttpResponse::Ok().json(TestRunResponse::from(test_run)))
}

/// Get the test runs of a task.
///
/// GET /api/v1/tasks/{task_id}/test-runs
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}/test-runs",
    tag = "Test Runs",
    params(("task_id" = Uuid, Path, description = "Task UUID")),
    responses(
        (status = 200, description = "Test runs for the task", body = TestRunListResponse),
        (status = 404, description = "Task not found")
    )
)]
#[get("/tasks/{task_id}/test-runs")]
pub async fn get_task_test_runs(
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let task_id = path.into_inner();

    db::tasks::find_by_id(pool.connection(), task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

    let test_runs = db::test_runs::list_by_task(pool.connection(), task_id).await?;

    Ok(HttpResponse::Ok().json(TestRunListResponse {
        test_runs: test_runs.into_iter().map(TestRunResponse::from).collect(),
    }))
}
