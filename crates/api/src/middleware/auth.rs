//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError};
use fintrack_core::auth::can_access;
use fintrack_shared::{Claims, JwtError, Role};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// Valid claims are stored in the request extensions, where [`AuthUser`]
/// picks them up.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_access_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                JwtError::Expired => ("token_expired", "Token has expired"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for authenticated user claims.
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let user_id = user.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Returns the username the token was issued to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.0.username
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.0.role
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }

    /// Fails with 403 unless the caller is an administrator.
    ///
    /// # Errors
    ///
    /// Returns a forbidden error for non-admin callers.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.0.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Administrator role required"))
        }
    }

    /// Fails with 403 unless the caller owns `owner` or is an administrator.
    ///
    /// # Errors
    ///
    /// Returns a forbidden error when access is denied.
    pub fn require_access(&self, owner: Uuid) -> Result<(), ApiError> {
        if can_access(self.role(), &self.user_id(), &owner) {
            Ok(())
        } else {
            Err(ApiError::forbidden("You cannot access another user's data"))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fintrack_shared::TokenType;

    fn user(role: Role) -> AuthUser {
        AuthUser(Claims::new(
            Uuid::new_v4(),
            "asha",
            role,
            TokenType::Access,
            Utc::now() + Duration::hours(1),
        ))
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_require_admin() {
        assert!(user(Role::Admin).require_admin().is_ok());
        assert!(user(Role::User).require_admin().is_err());
    }

    #[test]
    fn test_require_access() {
        let regular = user(Role::User);
        assert!(regular.require_access(regular.user_id()).is_ok());
        assert!(regular.require_access(Uuid::new_v4()).is_err());
        assert!(user(Role::Admin).require_access(Uuid::new_v4()).is_ok());
    }
}
