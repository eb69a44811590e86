use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::application::UpdateProfile;

use super::AppState;
use super::auth::{AuthUser, UserBody};
use super::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn me(AuthUser(user): AuthUser) -> Json<UserBody> {
    Json(user.into())
}

pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserBody>> {
    let updated = state
        .service
        .update_profile(
            user.id,
            UpdateProfile {
                name: req.name,
                email: req.email,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(updated.into()))
}
