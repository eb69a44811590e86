use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::{AppError, NewTransaction, TransactionFilter, UpdateTransaction};
use crate::domain::{Transaction, TransactionId, TransactionKind, cents_to_units};
use crate::io::write_transactions_csv;

use super::AppState;
use super::auth::AuthUser;
use super::error::ApiResult;
use super::{parse_amount, parse_month};

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ListTransactionsParams {
    pub month: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransactionBody {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl From<Transaction> for TransactionBody {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            kind: transaction.kind,
            category: transaction.category,
            amount: cents_to_units(transaction.amount_cents),
            description: transaction.description,
            date: transaction.date,
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateTransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionBody>)> {
    let transaction = state
        .service
        .create_transaction(
            user.id,
            NewTransaction {
                kind: req.kind,
                category: req.category,
                amount_cents: parse_amount(req.amount)?,
                description: req.description,
                date: req.date,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListTransactionsParams>,
) -> ApiResult<Json<Vec<TransactionBody>>> {
    let filter = parse_filter(&params)?;
    let transactions = state.service.list_transactions(user.id, filter).await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<TransactionId>,
    Json(req): Json<UpdateTransactionRequest>,
) -> ApiResult<Json<TransactionBody>> {
    let transaction = state
        .service
        .update_transaction(
            user.id,
            id,
            UpdateTransaction {
                kind: req.kind,
                category: req.category,
                amount_cents: req.amount.map(parse_amount).transpose()?,
                description: req.description.map(Some),
                date: req.date,
            },
        )
        .await?;

    Ok(Json(transaction.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<TransactionId>,
) -> ApiResult<Json<serde_json::Value>> {
    state.service.delete_transaction(user.id, id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Transaction deleted" }),
    ))
}

/// Download the caller's transactions as CSV, honoring the same filters
/// as the list endpoint.
pub async fn export(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListTransactionsParams>,
) -> ApiResult<impl IntoResponse> {
    let filter = parse_filter(&params)?;
    let transactions = state.service.list_transactions(user.id, filter).await?;

    let mut buffer = Vec::new();
    write_transactions_csv(&mut buffer, &transactions)
        .map_err(|err| AppError::Database(err.context("Failed to export transactions")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        buffer,
    ))
}

fn parse_filter(params: &ListTransactionsParams) -> Result<TransactionFilter, AppError> {
    let month = params.month.as_deref().map(parse_month).transpose()?;
    let kind = params
        .kind
        .as_deref()
        .map(|raw| {
            TransactionKind::from_str(raw).ok_or_else(|| {
                AppError::Validation("Type must be 'income' or 'expense'".to_string())
            })
        })
        .transpose()?;

    Ok(TransactionFilter {
        month,
        kind,
        category: params.category.clone(),
    })
}
