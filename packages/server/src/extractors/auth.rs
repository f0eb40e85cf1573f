use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Caller identity extracted from the `x-user-id` and `x-user-role` headers
/// set by the authenticating gateway.
///
/// Add this as a handler parameter to require an identified caller.
/// Admin checks happen via `require_admin()` in the handler body.
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Player,
    Admin,
}

impl CallerIdentity {
    /// Returns `Ok(())` for admins, `Err(PermissionDenied)` otherwise.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or(AppError::Unauthorized)?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let role = match role {
            "player" => Role::Player,
            "admin" => Role::Admin,
            _ => return Err(AppError::Unauthorized),
        };

        Ok(CallerIdentity { user_id, role })
    }
}
