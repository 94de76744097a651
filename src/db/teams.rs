//! Database queries for teams and team membership.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::team::{self, ActiveModel as TeamActiveModel, Entity as Team};
use crate::entity::team_member::{self, ActiveModel as TeamMemberActiveModel, Entity as TeamMember};
use crate::error::{AppError, AppResult};

/// Insert a new team.
pub async fn insert<C: ConnectionTrait>(db: &C, name: String) -> AppResult<team::Model> {
    let model = TeamActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name),
        created_at: Set(Utc::now()),
    };

    let result = model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert team: {}", e)))?;

    Ok(result)
}

/// Get a single team by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<team::Model>> {
    let result = Team::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get team: {}", e)))?;

    Ok(result)
}

/// List all teams.
pub async fn list<C: ConnectionTrait>(db: &C) -> AppResult<Vec<team::Model>> {
    let result = Team::find()
        .order_by_asc(team::Column::Name)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list teams: {}", e)))?;

    Ok(result)
}

/// Add an actor to a team.
pub async fn add_member<C: ConnectionTrait>(
    db: &C,
    team_id: Uuid,
    actor_id: Uuid,
) -> AppResult<team_member::Model> {
    let model = TeamMemberActiveModel {
        id: Set(Uuid::now_v7()),
        team_id: Set(team_id),
        actor_id: Set(actor_id),
        created_at: Set(Utc::now()),
    };

    let result = model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to add team member: {}", e)))?;

    Ok(result)
}

/// Get the team ids an actor belongs to.
pub async fn team_ids_of_actor<C: ConnectionTrait>(db: &C, actor_id: Uuid) -> AppResult<Vec<Uuid>> {
    let memberships = TeamMember::find()
        .filter(team_member::Column::ActorId.eq(actor_id))
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get team membership: {}", e)))?;

    Ok(memberships.into_iter().map(|m| m.team_id).collect())
}
