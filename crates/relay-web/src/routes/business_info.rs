//! Business-info organizer routes.

use axum::extract::State;
use axum::Json;
use database::BusinessInfo;
use receptionist::{OrganizeOutcome, OrganizedKind};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeRequest {
    #[serde(default)]
    pub raw_text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeResponse {
    /// Blank input; nothing happened.
    pub skipped: bool,
    pub organized_info: Option<String>,
    pub kind: Option<OrganizedKind>,
    pub saved: bool,
    pub stale: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// The signed-in user's saved profile, or `null`.
pub async fn load(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Option<BusinessInfo>>> {
    Ok(Json(state.organizer.load(&user_id).await?))
}

/// Organize the posted text and save it.
///
/// Identity is optional at extraction so blank input is skipped even for
/// anonymous callers; otherwise a missing identity answers `401`.
pub async fn organize(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    ApiJson(request): ApiJson<OrganizeRequest>,
) -> Result<Json<OrganizeResponse>> {
    let user_id = user.map(|CurrentUser(id)| id);

    let outcome = state
        .organizer
        .organize_and_persist(user_id.as_deref(), &request.raw_text)
        .await?;

    let response = match outcome {
        OrganizeOutcome::Skipped => OrganizeResponse {
            skipped: true,
            ..Default::default()
        },
        OrganizeOutcome::Organized(organized) => OrganizeResponse {
            skipped: false,
            organized_info: Some(organized.markdown),
            kind: Some(organized.kind),
            saved: organized.saved,
            stale: organized.stale,
        },
    };

    Ok(Json(response))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.organizer.delete(&user_id).await?;
    Ok(Json(DeleteResponse { deleted }))
}
