/// Request authentication for Axum
///
/// This module resolves a presented bearer credential to an authenticated
/// identity. The API server wraps [`authenticate_bearer`] in an Axum
/// middleware layer that injects the resulting [`AuthContext`] into request
/// extensions; handlers extract it with the `Extension` extractor.
///
/// A request with no credential, a malformed credential, or a credential
/// that does not resolve to a stored token never reaches a handler — it is
/// rejected here with `Unauthenticated` semantics (HTTP 401). Ownership
/// checks (403) happen later, in [`crate::auth::access`].
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use tablekeep_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::token::validate_token_format;
use crate::models::token::Token;

/// Authenticated caller identity, added to request extensions
///
/// This is the explicit identity parameter threaded into every core call;
/// there is no ambient "current user" state anywhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Whether the user holds the admin role
    pub is_admin: bool,
}

impl AuthContext {
    /// Creates an auth context for a resolved token
    pub fn new(user_id: Uuid, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }
}

/// Error type for request authentication
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer credential
    InvalidFormat(String),

    /// Token did not resolve to a stored, unrevoked token
    InvalidToken(String),

    /// Database error during token lookup
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Extracts the bearer secret from an Authorization header value
///
/// Returns `MissingCredentials` when no header was sent and `InvalidFormat`
/// when the header is present but not of the `Bearer <token>` shape.
pub fn parse_bearer(auth_header: Option<&str>) -> Result<&str, AuthError> {
    let header = auth_header.ok_or(AuthError::MissingCredentials)?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Resolves a presented Authorization header to an authenticated identity
///
/// Validation order:
/// 1. Header present and of `Bearer <token>` shape
/// 2. Token format check (rejects garbage before any database access)
/// 3. Hash lookup against stored tokens, joined to the owning user
///
/// # Errors
///
/// Returns `AuthError` on any failure; the caller maps this to a 401
/// (or 500 for database faults). No partial result is ever produced.
pub async fn authenticate_bearer(
    pool: &PgPool,
    auth_header: Option<&str>,
) -> Result<AuthContext, AuthError> {
    let presented = parse_bearer(auth_header)?;

    if !validate_token_format(presented) {
        return Err(AuthError::InvalidToken("Invalid token".to_string()));
    }

    let identity = Token::validate(pool, presented)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Database error: {}", e)))?
        .ok_or_else(|| AuthError::InvalidToken("Invalid token".to_string()))?;

    Ok(AuthContext::new(identity.0, identity.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_new() {
        let user_id = Uuid::new_v4();

        let context = AuthContext::new(user_id, false);
        assert_eq!(context.user_id, user_id);
        assert!(!context.is_admin);

        let admin = AuthContext::new(user_id, true);
        assert!(admin.is_admin);
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(Some("Bearer tbk_abc")).unwrap(), "tbk_abc");

        assert!(matches!(
            parse_bearer(None),
            Err(AuthError::MissingCredentials)
        ));

        assert!(matches!(
            parse_bearer(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidFormat(_))
        ));

        // scheme prefix match is case-sensitive
        assert!(matches!(
            parse_bearer(Some("bearer tbk_abc")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
