//! Bearer-token authentication extractor for Axum handlers.
//!
//! Every `/api` route except login and refresh takes an [`AuthUser`]. The
//! extracted id is the acting user that writes such as activity creation
//! record; it is always passed on explicitly, never kept in shared state.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller behind a valid access token.
///
/// ```ignore
/// async fn create(auth: AuthUser, Json(input): Json<CreateActivity>) -> AppResult<..> {
///     ActivityRepo::create(&state.pool, auth.user_id, &input).await?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        // Tokens outlive deactivation; the account must still be usable.
        match UserRepo::find_by_id(&state.pool, claims.sub).await? {
            Some(user) if user.is_active => Ok(AuthUser { user_id: user.id }),
            _ => Err(unauthorized("User not found or inactive")),
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}
