use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::application::{AppError, MonthSummary, MonthlyReport};
use crate::domain::{BudgetLine, Month, cents_to_units};

use super::AppState;
use super::auth::AuthUser;
use super::error::ApiResult;
use super::parse_month;

/// Months of history shown by the trends endpoint when no range is given.
const DEFAULT_TRENDS_MONTHS: u32 = 6;

#[derive(Debug, Deserialize)]
pub struct MonthParams {
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendsParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLineBody {
    pub category: String,
    pub budgeted: f64,
    pub actual: f64,
    pub remaining: f64,
}

impl From<BudgetLine> for BudgetLineBody {
    fn from(line: BudgetLine) -> Self {
        Self {
            category: line.category,
            budgeted: cents_to_units(line.budgeted),
            actual: cents_to_units(line.actual),
            remaining: cents_to_units(line.remaining),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportBody {
    pub month: Month,
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    pub category_breakdown: BTreeMap<String, f64>,
    pub budget_vs_actual: Vec<BudgetLineBody>,
}

impl From<MonthlyReport> for MonthlyReportBody {
    fn from(report: MonthlyReport) -> Self {
        Self {
            month: report.month,
            total_income: cents_to_units(report.total_income),
            total_expense: cents_to_units(report.total_expense),
            net: cents_to_units(report.net),
            category_breakdown: report
                .category_breakdown
                .into_iter()
                .map(|(category, cents)| (category, cents_to_units(cents)))
                .collect(),
            budget_vs_actual: report
                .budget_vs_actual
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsActualBody {
    pub month: Month,
    pub budget_vs_actual: Vec<BudgetLineBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummaryBody {
    pub month: Month,
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
}

impl From<MonthSummary> for MonthSummaryBody {
    fn from(summary: MonthSummary) -> Self {
        Self {
            month: summary.month,
            total_income: cents_to_units(summary.total_income),
            total_expense: cents_to_units(summary.total_expense),
            net: cents_to_units(summary.net),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsBody {
    pub from: Month,
    pub to: Month,
    pub months: Vec<MonthSummaryBody>,
}

/// Full monthly report: totals, expense breakdown and budget-vs-actual.
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<MonthParams>,
) -> ApiResult<Json<MonthlyReportBody>> {
    let month = required_month(params.month.as_deref())?;
    let report = state.service.build_monthly_report(user.id, month).await?;

    Ok(Json(report.into()))
}

/// The budget-anchored table alone; unbudgeted spending is visible only
/// in the summary's category breakdown.
pub async fn budget_vs_actual(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<MonthParams>,
) -> ApiResult<Json<BudgetVsActualBody>> {
    let month = required_month(params.month.as_deref())?;
    let report = state.service.build_monthly_report(user.id, month).await?;

    Ok(Json(BudgetVsActualBody {
        month: report.month,
        budget_vs_actual: report
            .budget_vs_actual
            .into_iter()
            .map(Into::into)
            .collect(),
    }))
}

pub async fn trends(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<TrendsParams>,
) -> ApiResult<Json<TrendsBody>> {
    let to = match params.to.as_deref() {
        Some(raw) => parse_month(raw)?,
        None => Month::from_date(Utc::now().date_naive()),
    };
    let from = match params.from.as_deref() {
        Some(raw) => parse_month(raw)?,
        None => {
            let mut month = to;
            for _ in 1..DEFAULT_TRENDS_MONTHS {
                month = month.pred();
            }
            month
        }
    };

    let report = state.service.trends(user.id, from, to).await?;

    Ok(Json(TrendsBody {
        from: report.from,
        to: report.to,
        months: report.months.into_iter().map(Into::into).collect(),
    }))
}

fn required_month(raw: Option<&str>) -> Result<Month, AppError> {
    match raw {
        Some(raw) => parse_month(raw),
        None => Err(AppError::Validation("Month is required".to_string())),
    }
}
