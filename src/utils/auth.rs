use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::models::User;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Header set by the authentication gateway in front of this service.
/// Token validation happens there; by the time a request reaches the
/// booking engine the user id is trusted.
const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated user. Resolves the gateway-provided
/// id to a full user row so handlers get identity, role and balance in
/// one place.
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or_else(|| AppError::AuthError("Missing or invalid user identity.".to_string()))?;

        let state = AppState::from_ref(state);
        let user = sqlx::query_as::<_, User>(
            r#"SELECT user_id, username, email, role, org_name, balance
               FROM users WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::AuthError(format!("Unknown user '{}'.", user_id)))?;

        Ok(CurrentUser(user))
    }
}
