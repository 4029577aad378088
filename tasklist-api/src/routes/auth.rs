/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new user, returns a token
/// - `POST /v1/auth/login` - Verify credentials, returns a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::validation_errors,
};
use axum::{extract::State, Json};
use tasklist_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username (case-sensitive, must be unique)
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// First name
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,

    /// Optional last name
    pub last_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Token response returned by both register and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,

    /// Token type (always "bearer")
    pub token_type: String,
}

/// Register a new user
///
/// Hashes the password, persists the user, and returns a token bound to
/// the username. The insert is a single statement, so a storage failure
/// leaves no partial account behind.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "hunter22",
///   "first_name": "Alice",
///   "last_name": "Liddell"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Username already registered
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Storage failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(validation_errors)?;

    // Early duplicate check for a friendly error; the unique constraint is
    // still the final arbiter and also maps to Conflict
    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let claims = jwt::Claims::new(&user.username, state.token_ttl());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Login endpoint
///
/// Verifies a user's credentials and returns a token. The failure response
/// is deliberately undifferentiated: an unknown username and a wrong
/// password produce the same error, so login never reveals whether an
/// account exists.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "hunter22"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Storage failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = User::find_by_username(&state.db, &req.username).await?;

    // Single undifferentiated rejection for both unknown username and
    // failed verification
    let valid = match &user {
        Some(user) => password::verify_password(&req.password, &user.password_hash)?,
        None => false,
    };

    let user = match (user, valid) {
        (Some(user), true) => user,
        _ => {
            return Err(ApiError::Unauthorized(
                "Invalid username or password".to_string(),
            ))
        }
    };

    let claims = jwt::Claims::new(&user.username, state.token_ttl());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            username: "alice".to_string(),
            password: "hunter22".to_string(),
            first_name: "Alice".to_string(),
            last_name: None,
        };
        assert!(req.validate().is_ok());

        let req = RegisterRequest {
            username: "".to_string(),
            password: "hunter22".to_string(),
            first_name: "Alice".to_string(),
            last_name: None,
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            username: "alice".to_string(),
            password: "short".to_string(),
            first_name: "Alice".to_string(),
            last_name: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_token_response_shape() {
        let resp = TokenResponse {
            access_token: "eyJ...".to_string(),
            token_type: "bearer".to_string(),
        };

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert!(json["access_token"].is_string());
    }
}
