//! User profile routes.

use axum::extract::State;
use axum::Json;
use database::{user, User};
use receptionist::sync_user;

use crate::auth::CurrentUser;
use crate::error::{Result, WebError};
use crate::state::AppState;

/// Mirror the identity provider's profile for the signed-in user.
pub async fn sync(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<User>> {
    let provider = state.identity.as_deref().ok_or(WebError::IdentityDisabled)?;
    Ok(Json(sync_user(provider, &state.db, &user_id).await?))
}

/// The stored profile, or `null` before the first sync.
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Option<User>>> {
    Ok(Json(user::get_user(state.db.pool(), &user_id).await?))
}
