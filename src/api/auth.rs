use axum::Json;
use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::application::AppError;
use crate::domain::{User, UserId};

use super::AppState;
use super::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; never carries credential material.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserBody,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (user, session) = state
        .service
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: session.token,
            user: user.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (user, session) = state.service.login(&req.email, &req.password).await?;

    Ok(Json(AuthResponse {
        token: session.token,
        user: user.into(),
    }))
}

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header before any handler runs. Missing or unknown tokens reject the
/// request with 401 without touching the store.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::from(AppError::Unauthorized(
                    "Missing authorization header".to_string(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::from(AppError::Unauthorized(
                "Authorization header must be a bearer token".to_string(),
            ))
        })?;

        let user = state.service.authenticate(token).await?;
        Ok(AuthUser(user))
    }
}
