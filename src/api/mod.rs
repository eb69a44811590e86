mod auth;
mod budgets;
mod error;
mod goals;
mod reports;
mod transactions;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tracing::info;

use crate::application::{AppError, FinanceService};
use crate::domain::{Cents, Month, units_to_cents};

pub use auth::AuthUser;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FinanceService>,
}

/// Build the full application router.
pub fn router(service: Arc<FinanceService>) -> Router {
    let state = AppState { service };

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(users::me).put(users::update_me))
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route("/transactions/export", get(transactions::export))
        .route(
            "/transactions/{id}",
            put(transactions::update).delete(transactions::remove),
        )
        .route("/budgets", post(budgets::create).get(budgets::list))
        .route("/budgets/{id}", put(budgets::update).delete(budgets::remove))
        .route("/goals", post(goals::create).get(goals::list))
        .route("/goals/{id}", put(goals::update).delete(goals::remove))
        .route("/reports/summary", get(reports::summary))
        .route("/reports/budget-vs-actual", get(reports::budget_vs_actual))
        .route("/reports/trends", get(reports::trends))
}

/// Bind and serve until the process is stopped.
pub async fn run_server(service: Arc<FinanceService>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(service);

    info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Strict `YYYY-MM` month parsing shared by every query surface;
/// malformed values are rejected before any store access.
fn parse_month(raw: &str) -> Result<Month, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("Month must be in YYYY-MM format".to_string()))
}

/// Convert a JSON currency-unit amount to cents, rejecting everything
/// that is not a positive representable quantity.
fn parse_amount(amount: f64) -> Result<Cents, AppError> {
    units_to_cents(amount)
        .filter(|cents| *cents > 0)
        .ok_or_else(|| AppError::Validation("Amount must be a positive number".to_string()))
}
