/// Authentication middleware: the session/identity resolver
///
/// Maps a validated Bearer token to the acting principal. The token's
/// signature, expiry, and issuer are checked first (no store access), then
/// the subject username is resolved to a `User` row on every request — the
/// principal is never cached across requests, so a deleted account stops
/// authenticating immediately.
///
/// On success a [`Principal`] is inserted into request extensions for
/// handlers to extract via `Extension<Principal>`. Any failure short-
/// circuits with 401 before the guarded handler runs.
///
/// # Example
///
/// ```ignore
/// use axum::Extension;
/// use tasklist_api::middleware::auth::Principal;
///
/// async fn handler(Extension(principal): Extension<Principal>) -> String {
///     format!("Hello, {}!", principal.username)
/// }
/// ```

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use tasklist_shared::{auth::jwt, models::user::User};

use crate::{app::AppState, error::ApiError};

/// The authenticated identity making a request
#[derive(Debug, Clone)]
pub struct Principal {
    /// User ID (owner key for task operations)
    pub id: i64,

    /// Username the token was bound to
    pub username: String,
}

/// JWT authentication middleware layer
///
/// Extracts and validates the JWT from the Authorization header, resolves
/// the subject to a user, and injects a [`Principal`] into request
/// extensions.
///
/// # Errors
///
/// - 401 if the header is missing or not a Bearer token, the token is
///   invalid or expired, or the subject no longer maps to a user
pub async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    // Signature/expiry/issuer checks happen before any store access
    let claims = jwt::validate_token(token, state.jwt_secret())?;

    // Re-fetch the principal per request; a token for a deleted account is
    // not a valid session
    let user = User::find_by_username(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!(subject = %claims.sub, "Token subject has no user row");
            ApiError::Unauthorized("Invalid token".to_string())
        })?;

    req.extensions_mut().insert(Principal {
        id: user.id,
        username: user.username,
    });

    Ok(next.run(req).await)
}
