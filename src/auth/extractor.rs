//! Actix-web extractor resolving the current actor.
//!
//! # Security
//! - Token values from headers are wrapped in `SecretString` immediately
//! - Tokens are never logged or exposed in debug output
//! - Memory is zeroized when secrets are dropped
//! - The bootstrap admin key is compared in constant time

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use super::AdminKey;
use crate::config::{ACTOR_TOKEN_HEADER, ADMIN_KEY_HEADER};
use crate::db::DbPool;
use crate::error::ErrorResponse;
use crate::models::{Actor, Role};
use crate::services::actor_admin;

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHENTICATED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a resolvable actor.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: ActorAuth) -> impl Responder {
///     // auth.actor is the authenticated actor with its roles
/// }
/// ```
///
/// The absence of a resolvable actor is terminal for every workflow entry
/// point; role checks happen afterwards via `auth::authorize`.
pub struct ActorAuth {
    pub actor: Actor,
}

impl FromRequest for ActorAuth {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let pool = match req.app_data::<web::Data<DbPool>>() {
                Some(pool) => pool.clone(),
                None => {
                    return Err(AuthError {
                        message: "Internal configuration error".to_string(),
                    });
                }
            };

            // Get stored admin key from app data (optional)
            let stored_admin_key = req.app_data::<web::Data<AdminKey>>().cloned();

            // Extract secrets from headers - immediately wrapped in SecretString
            let provided_token = extract_secret_header(&req, ACTOR_TOKEN_HEADER);
            let provided_admin_key = extract_secret_header(&req, ADMIN_KEY_HEADER);

            // Check admin key first (for bootstrap operations)
            // Uses constant-time comparison to prevent timing attacks
            if let Some(ref provided) = provided_admin_key
                && let Some(key) = stored_admin_key
                && key.verify(provided.expose_secret())
            {
                // Admin key authenticated - synthesize the bootstrap actor
                return Ok(ActorAuth {
                    actor: Actor {
                        id: Uuid::nil(),
                        username: "Admin (Bootstrap)".to_string(),
                        token_prefix: "admin".to_string(),
                        roles: vec![Role::Admin],
                    },
                });
            }

            // Check actor token against the database
            match provided_token {
                Some(ref token) => {
                    match actor_admin::verify_token(&pool, token.expose_secret()).await {
                        Ok(actor) => Ok(ActorAuth { actor }),
                        Err(e) => Err(AuthError {
                            message: e.to_string(),
                        }),
                    }
                    // Note: token is dropped here, memory zeroized
                }
                None => Err(AuthError {
                    message: "Missing actor token. Provide X-Actor-Token header.".to_string(),
                }),
            }
        })
    }
}
