//! Task API handlers (thin parent-container CRUD).

use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;

use crate::auth::{self, ActorAuth};
use crate::db::tasks::NewTask;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::task::{CreateTaskRequest, TaskListResponse, TaskResponse};
use crate::models::Role;

/// Configure task routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_task).service(list_tasks).service(get_task);
}

/// Create a task.
///
/// POST /api/v1/tasks
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    tag = "Tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin or QA role required"),
        (status = 404, description = "Team not found")
    ),
    security(("actor_token" = []))
)]
#[post("/tasks")]
pub async fn create_task(
    auth: ActorAuth,
    body: web::Json<CreateTaskRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Admin, Role::Qa])?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title is required".to_string()));
    }

    db::teams::find_by_id(pool.connection(), body.team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team".to_string()))?;

    let created = db::tasks::insert(
        pool.connection(),
        NewTask {
            team_id: body.team_id,
            title: title.to_string(),
            description: body.description.clone(),
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(TaskResponse::from(created)))
}

/// List all tasks.
///
/// GET /api/v1/tasks
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "Tasks",
    responses(
        (status = 200, description = "List of tasks", body = TaskListResponse)
    )
)]
#[get("/tasks")]
pub async fn list_tasks(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let tasks = db::tasks::list(pool.connection()).await?;

    Ok(HttpResponse::Ok().json(TaskListResponse {
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}

/// Get a single task.
///
/// GET /api/v1/tasks/{id}
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "Task UUID")),
    responses(
        (status = 200, description = "The task", body = TaskResponse),
        (status = 404, description = "Task not found")
    )
)]
#[get("/tasks/{id}")]
pub async fn get_task(path: web::Path<Uuid>, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let task = db::tasks::find_by_id(pool.connection(), path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task".to_string()))?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}
