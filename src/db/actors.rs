//! Database queries for actors.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::actor::{self, ActiveModel as ActorActiveModel, Entity as Actor};
use crate::error::{AppError, AppResult};

/// Represents an actor to be inserted.
pub struct NewActor {
    pub username: String,
    pub token_hash: String,
    pub token_prefix: String,
    pub roles: String,
}

/// Insert a new actor.
pub async fn insert<C: ConnectionTrait>(db: &C, new_actor: NewActor) -> AppResult<actor::Model> {
    let model = ActorActiveModel {
        id: Set(Uuid::now_v7()),
        username: Set(new_actor.username),
        token_hash: Set(new_actor.token_hash),
        token_prefix: Set(new_actor.token_prefix),
        roles: Set(new_actor.roles),
        created_at: Set(Utc::now()),
        deleted_at: Set(None),
    };

    let result = model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert actor: {}", e)))?;

    Ok(result)
}

/// Find an active actor by token hash.
pub async fn find_by_token_hash<C: ConnectionTrait>(
    db: &C,
    token_hash: &str,
) -> AppResult<Option<actor::Model>> {
    let result = Actor::find()
        .filter(actor::Column::TokenHash.eq(token_hash))
        .filter(actor::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to look up actor: {}", e)))?;

    Ok(result)
}

/// Find an active actor by username.
pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> AppResult<Option<actor::Model>> {
    let result = Actor::find()
        .filter(actor::Column::Username.eq(username))
        .filter(actor::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to look up actor: {}", e)))?;

    Ok(result)
}

/// List all active actors.
pub async fn list_active<C: ConnectionTrait>(db: &C) -> AppResult<Vec<actor::Model>> {
    let result = Actor::find()
        .filter(actor::Column::DeletedAt.is_null())
        .order_by_asc(actor::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list actors: {}", e)))?;

    Ok(result)
}

/// Revoke an actor (soft delete). Returns the updated row.
pub async fn revoke<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<actor::Model> {
    let existing = Actor::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to look up actor: {}", e)))?
        .ok_or_else(|| AppError::NotFound("Actor".to_string()))?;

    let mut model: ActorActiveModel = existing.into();
    model.deleted_at = Set(Some(Utc::now()));

    let result = model
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to revoke actor: {}", e)))?;

    Ok(result)
}
