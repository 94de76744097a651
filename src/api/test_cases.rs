//! Test case API handlers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use uuid::Uuid;

use crate::auth::{self, ActorAuth};
use crate::db::test_cases::{NewTestCase, TestCaseUpdate};
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::test_case::{
    CreateTestCaseRequest, TestCaseListResponse, TestCaseResponse, UpdateTestCaseRequest,
};
use crate::models::{Role, StatusCategory};
use crate::services::StatusCatalog;
use crate::services::catalog::names;

/// Configure test case routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_test_case)
        .service(get_test_case)
        .service(get_task_test_cases)
        .service(update_test_case)
        .service(delete_test_case);
}

/// Validate a submitted status id against the TestCaseStatus category.
fn validate_status(catalog: &StatusCatalog, status_id: Uuid) -> AppResult<()> {
    if !catalog.contains(StatusCategory::TestCaseStatus, status_id) {
        return Err(AppError::InvalidStatus(format!(
            "Status id {} does not resolve to a test case status",
            status_id
        )));
    }
    Ok(())
}

/// Validate a submitted case type id against the catalog.
fn validate_case_type(catalog: &StatusCatalog, case_type_id: Uuid) -> AppResult<()> {
    if !catalog.contains_id(case_type_id) {
        return Err(AppError::InvalidStatus(format!(
            "Type id {} does not belong to the catalog",
            case_type_id
        )));
    }
    Ok(())
}

/// Create a test case.
///
/// POST /api/v1/test-cases
#[utoipa::path(
    post,
    path = "/api/v1/test-cases",
    tag = "Test Cases",
    request_body = CreateTestCaseRequest,
    responses(
        (status = 201, description = "Test case created", body = TestCaseResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "QA role required"),
        (status = 404, description = "Task or team not found")
    ),
    security(("actor_token" = []))
)]
#[post("/test-cases")]
pub async fn create_test_case(
    auth: ActorAuth,
    body: web::Json<CreateTestCaseRequest>,
    pool: web::Data<DbPool>,
    catalog: web::Data<StatusCatalog>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Qa])?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }

    db::tasks::find_by_id(pool.connection(), body.task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

    db::teams::find_by_id(pool.connection(), body.team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team".to_string()))?;

    let status_id = match body.status_id {
        Some(status_id) => {
            validate_status(&catalog, status_id)?;
            status_id
        }
        None => catalog.require(StatusCategory::TestCaseStatus, names::DRAFT)?,
    };

    if let Some(case_type_id) = body.case_type_id {
        validate_case_type(&catalog, case_type_id)?;
    }

    let created = db::test_cases::insert(
        pool.connection(),
        NewTestCase {
            task_id: body.task_id,
            team_id: body.team_id,
            title: title.to_string(),
            description: body.description.clone(),
            steps: body.steps.clone(),
            expected_result: body.expected_result.clone(),
            case_type_id: body.case_type_id,
            status_id,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(TestCaseResponse::from(created)))
}

/// Get a single test case.
///
/// GET /api/v1/test-cases/{id}
#[utoipa::path(
    get,
    path = "/api/v1/test-cases/{id}",
    tag = "Test Cases",
    params(("id" = Uuid, Path, description = "Test case UUID")),
    responses(
        (status = 200, description = "The test case", body = TestCaseResponse),
        (status = 404, description = "Test case not found")
    )
)]
#[get("/test-cases/{id}")]
pub async fn get_test_case(
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let test_case = db::test_cases::find_by_id(pool.connection(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Test case".to_string()))?;

    Ok(HttpResponse::Ok().json(TestCaseResponse::from(test_case)))
}

/// Get the test cases of a task.
///
/// GET /api/v1/tasks/{task_id}/test-cases
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}/test-cases",
    tag = "Test Cases",
    params(("task_id" = Uuid, Path, description = "Task UUID")),
    responses(
        (status = 200, description = "Test cases for the task", body = TestCaseListResponse),
        (status = 404, description = "Task not found")
    )
)]
#[get("/tasks/{task_id}/test-cases")]
pub async fn get_task_test_cases(
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let task_id = path.into_inner();

    db::tasks::find_by_id(pool.connection(), task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

    let test_cases = db::test_cases::list_by_task(pool.connection(), task_id).await?;

    Ok(HttpResponse::Ok().json(TestCaseListResponse {
        test_cases: test_cases.into_iter().map(TestCaseResponse::from).collect(),
    }))
}

/// Edit a test case.
///
/// PUT /api/v1/test-cases/{id}
#[utoipa::path(
    put,
    path = "/api/v1/test-cases/{id}",
    tag = "Test Cases",
    params(("id" = Uuid, Path, description = "Test case UUID")),
    request_body = UpdateTestCaseRequest,
    responses(
        (status = 200, description = "Test case updated", body = TestCaseResponse),
        (status = 400, description = "Invalid status or type id"),
        (status = 403, description = "QA role required"),
        (status = 404, description = "Test case not found")
    ),
    security(("actor_token" = []))
)]
#[put("/test-cases/{id}")]
pub async fn update_test_case(
    auth: ActorAuth,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestCaseRequest>,
    pool: web::Data<DbPool>,
    catalog: web::Data<StatusCatalog>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Qa])?;

    if let Some(status_id) = body.status_id {
        validate_status(&catalog, status_id)?;
    }
    if let Some(case_type_id) = body.case_type_id {
        validate_case_type(&catalog, case_type_id)?;
    }

    let existing = db::test_cases::find_by_id(pool.connection(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Test case".to_string()))?;

    let updated = db::test_cases::update(
        pool.connection(),
        existing,
        TestCaseUpdate {
            title: body.title.clone(),
            description: body.description.clone(),
            steps: body.steps.clone(),
            expected_result: body.expected_result.clone(),
            case_type_id: body.case_type_id,
            status_id: body.status_id,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(TestCaseResponse::from(updated)))
}

/// Delete a test case.
///
/// Only permitted for orphaned cases - a case referenced by any execution
/// record is part of the workflow history and cannot be removed.
///
/// DELETE /api/v1/test-cases/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/test-cases/{id}",
    tag = "Test Cases",
    params(("id" = Uuid, Path, description = "Test case UUID")),
    responses(
        (status = 204, description = "Test case deleted"),
        (status = 400, description = "Test case is referenced by executions"),
        (status = 403, description = "QA role required"),
        (status = 404, description = "Test case not found")
    ),
    security(("actor_token" = []))
)]
#[delete("/test-cases/{id}")]
pub async fn delete_test_case(
    auth: ActorAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Qa])?;

    let existing = db::test_cases::find_by_id(pool.connection(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Test case".to_string()))?;

    let executions = db::test_executions::count_by_case(pool.connection(), existing.id).await?;
    if executions > 0 {
        return Err(AppError::InvalidInput(format!(
            "Test case is referenced by {} execution record(s) and cannot be deleted",
            executions
        )));
    }

    db::test_cases::delete(pool.connection(), existing.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
