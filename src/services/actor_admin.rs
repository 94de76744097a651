//! Actor token service and management endpoints.
//!
//! Actors authenticate with bearer-style tokens: the token is generated once,
//! shown to the caller once, and only its SHA-256 hash is stored. Management
//! endpoints are gated on the Admin role (or the bootstrap admin key, which
//! the auth extractor maps to an admin actor).

use actix_web::{HttpResponse, delete, get, post, web};
use rand::{RngExt, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::ActorAuth;
use crate::db::actors::NewActor;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::actor::{
    ActorCreateResponse, ActorListItem, ActorListResponse, ActorResponse, CreateActorRequest,
    roles_to_csv,
};
use crate::models::{Actor, Role};

/// Actor token prefix.
const TOKEN_PREFIX: &str = "qat_";
/// Length of random part of the token.
const TOKEN_RANDOM_LENGTH: usize = 32;
/// Length of the token prefix stored for identification.
const TOKEN_PREFIX_LENGTH: usize = 8;

/// Generate a new random actor token.
///
/// Returns the full token (to be shown to the caller once) and the actor row
/// data for storage.
pub fn generate_token(username: &str, roles: &[Role]) -> (String, NewActor) {
    let random_part: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_RANDOM_LENGTH)
        .map(char::from)
        .collect();

    let full_token = format!("{}{}", TOKEN_PREFIX, random_part);

    // Hash the token for storage
    let token_hash = hash_token(&full_token);

    // Extract prefix for identification (first 8 chars of full token)
    let token_prefix = full_token
        .chars()
        .take(TOKEN_PREFIX_LENGTH)
        .collect::<String>();

    let new_actor = NewActor {
        username: username.to_string(),
        token_hash,
        token_prefix,
        roles: roles_to_csv(roles),
    };

    (full_token, new_actor)
}

/// Hash an actor token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify an actor token and return the authenticated actor.
pub async fn verify_token(pool: &DbPool, token: &str) -> AppResult<Actor> {
    let token_hash = hash_token(token);

    let model = db::actors::find_by_token_hash(pool.connection(), &token_hash)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Invalid actor token".to_string()))?;

    Ok(Actor::from(model))
}

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_actor)
        .service(list_actors)
        .service(revoke_actor)
        .service(me);
}

/// Create a new actor.
///
/// POST /api/v1/auth/actors
#[utoipa::path(
    post,
    path = "/api/v1/auth/actors",
    tag = "Auth",
    request_body = CreateActorRequest,
    responses(
        (status = 201, description = "Actor created, token shown once", body = ActorCreateResponse),
        (status = 403, description = "Admin role required"),
        (status = 400, description = "Invalid input")
    ),
    security(("actor_token" = []))
)]
#[post("/auth/actors")]
pub async fn create_actor(
    auth: ActorAuth,
    body: web::Json<CreateActorRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    if !auth.actor.is_admin() {
        return Err(AppError::Unauthorized(
            "Admin role required to create actors".to_string(),
        ));
    }

    let username = body.username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput("username is required".to_string()));
    }
    if body.roles.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one role is required".to_string(),
        ));
    }

    if db::actors::find_by_username(pool.connection(), username)
        .await?
        .is_some()
    {
        return Err(AppError::InvalidInput(format!(
            "An actor named '{}' already exists",
            username
        )));
    }

    let (full_token, new_actor) = generate_token(username, &body.roles);
    let created = db::actors::insert(pool.connection(), new_actor).await?;

    tracing::info!(
        actor_id = %created.id,
        username = %created.username,
        roles = %created.roles,
        "Created actor"
    );

    Ok(HttpResponse::Created().json(ActorCreateResponse {
        id: created.id,
        username: created.username,
        token: full_token,
        roles: body.roles.clone(),
    }))
}

/// List all active actors.
///
/// GET /api/v1/auth/actors
#[utoipa::path(
    get,
    path = "/api/v1/auth/actors",
    tag = "Auth",
    responses(
        (status = 200, description = "List of actors", body = ActorListResponse),
        (status = 403, description = "Admin role required")
    ),
    security(("actor_token" = []))
)]
#[get("/auth/actors")]
pub async fn list_actors(auth: ActorAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    if !auth.actor.is_admin() {
        return Err(AppError::Unauthorized(
            "Admin role required to list actors".to_string(),
        ));
    }

    let actors = db::actors::list_active(pool.connection()).await?;
    let items: Vec<ActorListItem> = actors.into_iter().map(ActorListItem::from).collect();

    Ok(HttpResponse::Ok().json(ActorListResponse { actors: items }))
}

/// Revoke an actor (soft delete).
///
/// DELETE /api/v1/auth/actors/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/auth/actors/{id}",
    tag = "Auth",
    params(("id" = Uuid, Path, description = "Actor UUID")),
    responses(
        (status = 204, description = "Actor revoked"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Actor not found")
    ),
    security(("actor_token" = []))
)]
#[delete("/auth/actors/{id}")]
pub async fn revoke_actor(
    auth: ActorAuth,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    if !auth.actor.is_admin() {
        return Err(AppError::Unauthorized(
            "Admin role required to revoke actors".to_string(),
        ));
    }

    let id = path.into_inner();
    let revoked = db::actors::revoke(pool.connection(), id).await?;

    tracing::info!(actor_id = %revoked.id, username = %revoked.username, "Revoked actor");

    Ok(HttpResponse::NoContent().finish())
}

/// Get the current actor.
///
/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current actor", body = ActorResponse),
        (status = 401, description = "Unauthenticated")
    ),
    security(("actor_token" = []))
)]
#[get("/auth/me")]
pub async fn me(auth: ActorAuth) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ActorResponse::from(&auth.actor)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let (full_token, new_actor) = generate_token("alice", &[Role::Qa, Role::Tester]);

        assert!(full_token.starts_with(TOKEN_PREFIX));
        assert_eq!(full_token.len(), TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH);
        assert_eq!(new_actor.token_prefix.len(), TOKEN_PREFIX_LENGTH);
        assert_eq!(new_actor.roles, "qa,tester");
        assert_eq!(new_actor.token_hash, hash_token(&full_token));
    }

    #[test]
    fn test_hash_token() {
        let token = "qat_test123";
        let hash1 = hash_token(token);
        let hash2 = hash_token(token);

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex chars
    }

    #[test]
    fn test_tokens_are_unique() {
        let (token_a, _) = generate_token("alice", &[Role::Qa]);
        let (token_b, _) = generate_token("alice", &[Role::Qa]);

        assert_ne!(token_a, token_b);
    }
}
