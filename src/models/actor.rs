//! Actor and role models for authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::actor;

/// Workflow roles held by actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Qa,
    Tester,
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Qa => "qa",
            Self::Tester => "tester",
            Self::Developer => "developer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "qa" => Some(Self::Qa),
            "tester" => Some(Self::Tester),
            "developer" => Some(Self::Developer),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a comma-separated role list, ignoring unknown entries.
pub fn roles_from_csv(csv: &str) -> Vec<Role> {
    csv.split(',').filter_map(Role::parse).collect()
}

/// Serialize roles back to the comma-separated storage form.
pub fn roles_to_csv(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// The authenticated actor resolved for a request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    pub token_prefix: String,
    pub roles: Vec<Role>,
}

impl Actor {
    /// Check if the actor holds a specific role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Check if the actor has admin role.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

impl From<actor::Model> for Actor {
    fn from(model: actor::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            token_prefix: model.token_prefix,
            roles: roles_from_csv(&model.roles),
        }
    }
}

/// Request to create a new actor.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateActorRequest {
    pub username: String,
    pub roles: Vec<Role>,
}

/// Response when creating a new actor (includes the full token).
#[derive(Debug, Serialize, ToSchema)]
pub struct ActorCreateResponse {
    pub id: Uuid,
    pub username: String,
    pub token: String, // Full token - only shown once
    pub roles: Vec<Role>,
}

/// Response for listing actors (token masked).
#[derive(Debug, Serialize, ToSchema)]
pub struct ActorListItem {
    pub id: Uuid,
    pub username: String,
    pub token_prefix: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub is_revoked: bool,
}

impl From<actor::Model> for ActorListItem {
    fn from(model: actor::Model) -> Self {
        Self {
            id: model.id,
            username: model.username.clone(),
            token_prefix: model.token_prefix.clone(),
            roles: roles_from_csv(&model.roles),
            created_at: model.created_at,
            is_revoked: model.deleted_at.is_some(),
        }
    }
}

/// Actor list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActorListResponse {
    pub actors: Vec<ActorListItem>,
}

/// Current-actor response (returned by /auth/me).
#[derive(Debug, Serialize, ToSchema)]
pub struct ActorResponse {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
}

impl From<&Actor> for ActorResponse {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            username: actor.username.clone(),
            roles: actor.roles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::parse("qa"), Some(Role::Qa));
        assert_eq!(Role::parse("QA"), Some(Role::Qa));
        assert_eq!(Role::parse(" tester "), Some(Role::Tester));
        assert_eq!(Role::parse("manager"), None);
    }

    #[test]
    fn test_roles_csv_round_trip() {
        let roles = vec![Role::Qa, Role::Tester];
        let csv = roles_to_csv(&roles);
        assert_eq!(csv, "qa,tester");
        assert_eq!(roles_from_csv(&csv), roles);
    }

    #[test]
    fn test_roles_from_csv_ignores_unknown() {
        assert_eq!(roles_from_csv("qa,unknown,tester"), vec![Role::Qa, Role::Tester]);
        assert_eq!(roles_from_csv(""), Vec::<Role>::new());
    }

    #[test]
    fn test_has_role() {
        let actor = Actor {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            token_prefix: "qat_abcd".to_string(),
            roles: vec![Role::Qa],
        };

        assert!(actor.has_role(Role::Qa));
        assert!(!actor.has_role(Role::Tester));
        assert!(!actor.is_admin());
    }
}
