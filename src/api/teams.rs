//! Team API handlers.

use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;

use crate::auth::{self, ActorAuth};
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::team::{AddTeamMemberRequest, CreateTeamRequest, TeamListResponse, TeamResponse};
use crate::models::Role;

/// Configure team routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team).service(list_teams).service(add_member);
}

/// Create a team.
///
/// POST /api/v1/teams
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    tag = "Teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin role required")
    ),
    security(("actor_token" = []))
)]
#[post("/teams")]
pub async fn create_team(
    auth: ActorAuth,
    body: web::Json<CreateTeamRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Admin])?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("name is required".to_string()));
    }

    let created = db::teams::insert(pool.connection(), name.to_string()).await?;

    Ok(HttpResponse::Created().json(TeamResponse::from(created)))
}

/// List all teams.
///
/// GET /api/v1/teams
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "Teams",
    responses(
        (status = 200, description = "List of teams", body = TeamListResponse)
    )
)]
#[get("/teams")]
pub async fn list_teams(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let teams = db::teams::list(pool.connection()).await?;

    Ok(HttpResponse::Ok().json(TeamListResponse {
        teams: teams.into_iter().map(TeamResponse::from).collect(),
    }))
}

/// Add an actor to a team.
///
/// POST /api/v1/teams/{id}/members
#[utoipa::path(
    post,
    path = "/api/v1/teams/{id}/members",
    tag = "Teams",
    params(("id" = Uuid, Path, description = "Team UUID")),
    request_body = AddTeamMemberRequest,
    responses(
        (status = 204, description = "Member added"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Team not found")
    ),
    security(("actor_token" = []))
)]
#[post("/teams/{id}/members")]
pub async fn add_member(
    auth: ActorAuth,
    path: web::Path<Uuid>,
    body: web::Json<AddTeamMemberRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth::authorize(&auth.actor, &[Role::Admin])?;

    let team_id = path.into_inner();

    db::teams::find_by_id(pool.connection(), team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team".to_string()))?;

    db::teams::add_member(pool.connection(), team_id, body.actor_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
