//! Authentication and authorization for workflow entry points.

mod extractor;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::ActorAuth;

use crate::error::{AppError, AppResult};
use crate::models::{Actor, Role};

/// Check that the actor holds at least one of the required roles.
///
/// Pure predicate over the actor's role set; there is no implicit owner
/// bypass. Every workflow transition passes through this gate.
pub fn authorize(actor: &Actor, required: &[Role]) -> AppResult<()> {
    if required.iter().any(|role| actor.has_role(*role)) {
        return Ok(());
    }

    let role_names = required
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(" or ");

    Err(AppError::Unauthorized(format!(
        "Requires the {} role",
        role_names
    )))
}

/// Wrapper type for the bootstrap admin key.
/// Uses `SecretString` to prevent accidental logging and zeroize on drop.
///
/// # Security features
/// - `Debug` prints `[REDACTED]` instead of the actual value
/// - Memory is zeroed when dropped (via `zeroize`)
/// - Cannot be accidentally logged or printed
/// - Explicit `.expose_secret()` required to access the value
#[derive(Clone)]
pub struct AdminKey(Option<SecretString>);

impl AdminKey {
    /// Create a new AdminKey from an optional string.
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(SecretString::from))
    }

    /// Securely compare the provided key with the stored admin key.
    ///
    /// Uses `subtle::ConstantTimeEq` which performs a constant-time
    /// byte-by-byte comparison without early-exit branching, so neither the
    /// content nor the length of the key leaks through timing.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => {
                let expected = secret.expose_secret();
                // ConstantTimeEq returns 0 (false) for unequal lengths without
                // any early exit, preventing a length oracle.
                expected.as_bytes().ct_eq(provided.as_bytes()).into()
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "AdminKey([REDACTED])"),
            None => write!(f, "AdminKey(None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn actor_with(roles: Vec<Role>) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            token_prefix: "qat_abcd".to_string(),
            roles,
        }
    }

    #[test]
    fn test_authorize_any_of() {
        let qa = actor_with(vec![Role::Qa]);
        assert!(authorize(&qa, &[Role::Qa, Role::Tester]).is_ok());

        let tester = actor_with(vec![Role::Tester]);
        assert!(authorize(&tester, &[Role::Qa, Role::Tester]).is_ok());
    }

    #[test]
    fn test_authorize_rejects_missing_role() {
        let developer = actor_with(vec![Role::Developer]);
        let err = authorize(&developer, &[Role::Qa, Role::Tester]).unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.to_string(), "Unauthorized: Requires the qa or tester role");
    }

    #[test]
    fn test_authorize_no_owner_bypass_for_admin() {
        // Admin is only accepted when a caller explicitly lists it.
        let admin = actor_with(vec![Role::Admin]);
        assert!(authorize(&admin, &[Role::Tester]).is_err());
        assert!(authorize(&admin, &[Role::Admin, Role::Tester]).is_ok());
    }

    #[test]
    fn test_admin_key_verify() {
        let key = AdminKey::new(Some("super-secret".to_string()));
        assert!(key.verify("super-secret"));
        assert!(!key.verify("wrong"));
        assert!(!key.verify(""));

        let absent = AdminKey::new(None);
        assert!(!absent.verify("super-secret"));
    }

    #[test]
    fn test_admin_key_debug_redacted() {
        let key = AdminKey::new(Some("super-secret".to_string()));
        assert_eq!(format!("{:?}", key), "AdminKey([REDACTED])");
    }
}
