use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::{NewBudget, UpdateBudget};
use crate::domain::{Budget, BudgetId, Month, cents_to_units};

use super::AppState;
use super::auth::AuthUser;
use super::error::ApiResult;
use super::{parse_amount, parse_month};

#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub month: String,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    pub month: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListBudgetsParams {
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BudgetBody {
    pub id: BudgetId,
    pub month: Month,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
}

impl From<Budget> for BudgetBody {
    fn from(budget: Budget) -> Self {
        Self {
            id: budget.id,
            month: budget.month,
            category: budget.category,
            amount: cents_to_units(budget.amount_cents),
            description: budget.description,
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateBudgetRequest>,
) -> ApiResult<(StatusCode, Json<BudgetBody>)> {
    let budget = state
        .service
        .create_budget(
            user.id,
            NewBudget {
                month: parse_month(&req.month)?,
                category: req.category,
                amount_cents: parse_amount(req.amount)?,
                description: req.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(budget.into())))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListBudgetsParams>,
) -> ApiResult<Json<Vec<BudgetBody>>> {
    let month = params.month.as_deref().map(parse_month).transpose()?;
    let budgets = state.service.list_budgets(user.id, month).await?;

    Ok(Json(budgets.into_iter().map(Into::into).collect()))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<BudgetId>,
    Json(req): Json<UpdateBudgetRequest>,
) -> ApiResult<Json<BudgetBody>> {
    let budget = state
        .service
        .update_budget(
            user.id,
            id,
            UpdateBudget {
                month: req.month.as_deref().map(parse_month).transpose()?,
                category: req.category,
                amount_cents: req.amount.map(parse_amount).transpose()?,
                description: req.description.map(Some),
            },
        )
        .await?;

    Ok(Json(budget.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<BudgetId>,
) -> ApiResult<Json<serde_json::Value>> {
    state.service.delete_budget(user.id, id).await?;
    Ok(Json(serde_json::json!({ "message": "Budget deleted" })))
}
