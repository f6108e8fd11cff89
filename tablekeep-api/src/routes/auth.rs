/// Authentication endpoints
///
/// This module provides the account and session endpoints:
/// - Registration (no token issued)
/// - Login (issues an opaque bearer token)
/// - Logout (revokes every token the caller holds)
/// - Current user lookup
///
/// # Endpoints
///
/// - `POST /register` - Create account
/// - `POST /login` - Authenticate and get a bearer token
/// - `POST /logout` - Log out of all devices
/// - `GET /me` - Current user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tablekeep_shared::{
    auth::{middleware::AuthContext, password},
    models::{
        token::Token,
        user::{CreateUser, User},
    },
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The plaintext bearer token (ONLY returned here, never again)
    pub token: String,

    /// Token type for the Authorization header
    pub token_type: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Number of tokens revoked across all devices
    pub revoked: u64,
}

/// Public user representation (no password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Admin role flag
    pub is_admin: bool,

    /// Account creation time
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Register a new user
///
/// Creates a non-admin account. No token is issued at registration; the
/// client logs in separately.
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {
///   "name": "Alice",
///   "email": "alice@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed (itemized by field)
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login endpoint
///
/// Authenticates a user and issues a fresh bearer token. The failure
/// message is identical for an unknown email and a wrong password, so
/// the endpoint cannot be used to enumerate accounts.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// {
///   "email": "alice@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "tbk_...",
///   "token_type": "Bearer"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let (_token, plaintext) = Token::issue(&state.db, user.id).await?;

    Ok(Json(LoginResponse {
        token: plaintext,
        token_type: "Bearer".to_string(),
    }))
}

/// Logout endpoint
///
/// Deletes every token the caller holds - logging out on one device logs
/// out all of them. Calling this twice in a row succeeds both times; the
/// second call simply revokes nothing.
///
/// # Endpoint
///
/// ```text
/// POST /logout
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid bearer token
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<LogoutResponse>> {
    let revoked = Token::revoke_all(&state.db, auth.user_id).await?;

    Ok(Json(LogoutResponse { revoked }))
}

/// Current user endpoint
///
/// Returns the public representation of the authenticated caller.
///
/// # Endpoint
///
/// ```text
/// GET /me
/// Authorization: Bearer <token>
/// ```
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserResponse>> {
    // A token row cannot outlive its user (cascade delete), so a miss here
    // means the identity vanished mid-request
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Unknown user".to_string()))?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekeep_shared::auth::password::MIN_PASSWORD_LENGTH;

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "secret1".to_string(),
        };

        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_empty_name() {
        let req = RegisterRequest {
            name: "".to_string(),
            email: "alice@x.com".to_string(),
            password: "secret1".to_string(),
        };

        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };

        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "short".to_string(),
        };

        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("password"));
    }

    #[test]
    fn test_password_rule_matches_minimum() {
        // The DTO rule and the published minimum must agree
        let at_minimum = "a".repeat(MIN_PASSWORD_LENGTH);
        let below_minimum = "a".repeat(MIN_PASSWORD_LENGTH - 1);

        let ok = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password: at_minimum,
        };
        assert!(ok.validate().is_ok());

        let too_short = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password: below_minimum,
        };
        assert!(too_short.validate().is_err());
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_admin: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let response: UserResponse = user.into();
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
