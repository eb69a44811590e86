use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::{AppError, NewGoal, UpdateGoal};
use crate::domain::{Cents, Goal, GoalId, cents_to_units, units_to_cents};

use super::AppState;
use super::auth::AuthUser;
use super::error::ApiResult;
use super::parse_amount;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: String,
    pub target_amount: f64,
    pub current_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalBody {
    pub id: GoalId,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
}

impl From<Goal> for GoalBody {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id,
            title: goal.title,
            target_amount: cents_to_units(goal.target_cents),
            current_amount: cents_to_units(goal.current_cents),
            deadline: goal.deadline,
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateGoalRequest>,
) -> ApiResult<(StatusCode, Json<GoalBody>)> {
    let goal = state
        .service
        .create_goal(
            user.id,
            NewGoal {
                title: req.title,
                target_cents: parse_amount(req.target_amount)?,
                current_cents: req.current_amount.map(parse_amount_or_zero).transpose()?,
                deadline: req.deadline,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(goal.into())))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<GoalBody>>> {
    let goals = state.service.list_goals(user.id).await?;
    Ok(Json(goals.into_iter().map(Into::into).collect()))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<GoalId>,
    Json(req): Json<UpdateGoalRequest>,
) -> ApiResult<Json<GoalBody>> {
    let goal = state
        .service
        .update_goal(
            user.id,
            id,
            UpdateGoal {
                title: req.title,
                target_cents: req.target_amount.map(parse_amount).transpose()?,
                current_cents: req.current_amount.map(parse_amount_or_zero).transpose()?,
                deadline: req.deadline.map(Some),
            },
        )
        .await?;

    Ok(Json(goal.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<GoalId>,
) -> ApiResult<Json<serde_json::Value>> {
    state.service.delete_goal(user.id, id).await?;
    Ok(Json(serde_json::json!({ "message": "Goal deleted" })))
}

/// Goal progress may legitimately be zero; only negatives are rejected.
fn parse_amount_or_zero(amount: f64) -> Result<Cents, AppError> {
    units_to_cents(amount)
        .filter(|cents| *cents >= 0)
        .ok_or_else(|| AppError::Validation("Amount must not be negative".to_string()))
}
