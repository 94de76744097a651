//! Execution API handlers: result submission and run history.

use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;

use crate::auth::ActorAuth;
use crate::config::Config;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::execution::{
    ExecutionListResponse, ExecutionResponse, SubmitResultRequest, SubmitResultResponse,
};
use crate::services::execution::{self, SubmitResult};
use crate::services::StatusCatalog;

/// Configure execution routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_result)
        .service(get_execution)
        .service(get_run_executions);
}

/// Submit an execution result for a (run, case) pair.
///
/// Creates the execution record on first submission and updates it in place
/// afterwards. A result whose status resolves to Failed files a defect in
/// the same unit of work.
///
/// POST /api/v1/test-runs/{run_id}/test-cases/{case_id}/result
#[utoipa::path(
    post,
    path = "/api/v1/test-runs/{run_id}/test-cases/{case_id}/result",
    tag = "Executions",
    params(
        ("run_id" = Uuid, Path, description = "Test run UUID"),
        ("case_id" = Uuid, Path, description = "Test case UUID")
    ),
    request_body = SubmitResultRequest,
    responses(
        (status = 200, description = "Execution recorded", body = SubmitResultResponse),
        (status = 400, description = "Unknown status id"),
        (status = 403, description = "QA or Tester role required"),
        (status = 404, description = "Test run or test case not found")
    ),
    security(("actor_token" = []))
)]
#[post("/test-runs/{run_id}/test-cases/{case_id}/result")]
pub async fn submit_result(
    auth: ActorAuth,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<SubmitResultRequest>,
    pool: web::Data<DbPool>,
    catalog: web::Data<StatusCatalog>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let (run_id, case_id) = path.into_inner();
    let request = body.into_inner();

    let outcome = execution::record_result(
        pool.get_ref(),
        catalog.get_ref(),
        config.defect_filing,
        &auth.actor,
        run_id,
        case_id,
        SubmitResult {
            actual_result: request.actual_result,
            status_id: request.status_id,
            executing_team_id: request.executing_team_id,
            retries: request.retries,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(SubmitResultResponse {
        execution: ExecutionResponse::from(outcome.execution),
        filed_defect_id: outcome.filed_defect.map(|d| d.id),
    }))
}

/// Get the execution recorded for a (run, case) pair.
///
/// GET /api/v1/test-runs/{run_id}/test-cases/{case_id}/execution
#[utoipa::path(
    get,
    path = "/api/v1/test-runs/{run_id}/test-cases/{case_id}/execution",
    tag = "Executions",
    params(
        ("run_id" = Uuid, Path, description = "Test run UUID"),
        ("case_id" = Uuid, Path, description = "Test case UUID")
    ),
    responses(
        (status = 200, description = "The execution for the pair", body = ExecutionResponse),
        (status = 404, description = "No execution recorded for the pair")
    )
)]
#[get("/test-runs/{run_id}/test-cases/{case_id}/execution")]
pub async fn get_execution(
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let (run_id, case_id) = path.into_inner();

    let execution = db::test_executions::find_by_pair(pool.connection(), run_id, case_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Test execution".to_string()))?;

    Ok(HttpResponse::Ok().json(ExecutionResponse::from(execution)))
}

/// Get the execution history of a run, most recent first.
///
/// GET /api/v1/test-runs/{run_id}/executions
#[utoipa::path(
    get,
    path = "/api/v1/test-runs/{run_id}/executions",
    tag = "Executions",
    params(("run_id" = Uuid, Path, description = "Test run UUID")),
    responses(
        (status = 200, description = "Executions for the run", body = ExecutionListResponse),
        (status = 404, description = "Test run not found")
    )
)]
#[get("/test-runs/{run_id}/executions")]
pub async fn get_run_executions(
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let run_id = path.into_inner();

    db::test_runs::find_by_id(pool.connection(), run_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Test run".to_string()))?;

    let executions = db::test_executions::list_by_run(pool.connection(), run_id).await?;

    Ok(HttpResponse::Ok().json(ExecutionListResponse {
        executions: executions.into_iter().map(ExecutionResponse::from).collect(),
    }))
}
