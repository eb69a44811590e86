// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use fiscus::application::{FinanceService, NewBudget, NewTransaction};
use fiscus::domain::{Cents, Month, TransactionKind, UserId};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(FinanceService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = FinanceService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to register the default test account
pub async fn test_user(service: &FinanceService) -> Result<UserId> {
    let (user, _session) = service
        .register("Ada", "ada@example.com", "averysecurepassword")
        .await?;
    Ok(user.id)
}

/// Helper to register a second, unrelated account
pub async fn other_user(service: &FinanceService) -> Result<UserId> {
    let (user, _session) = service
        .register("Grace", "grace@example.com", "anothersecurepassword")
        .await?;
    Ok(user.id)
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Helper to parse a month string into Month
pub fn parse_month(month_str: &str) -> Month {
    month_str.parse().unwrap()
}

pub async fn record_expense(
    service: &FinanceService,
    owner: UserId,
    category: &str,
    amount_cents: Cents,
    date_str: &str,
) -> Result<()> {
    service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: category.to_string(),
                amount_cents,
                description: None,
                date: parse_date(date_str),
            },
        )
        .await?;
    Ok(())
}

pub async fn record_income(
    service: &FinanceService,
    owner: UserId,
    category: &str,
    amount_cents: Cents,
    date_str: &str,
) -> Result<()> {
    service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Income,
                category: category.to_string(),
                amount_cents,
                description: None,
                date: parse_date(date_str),
            },
        )
        .await?;
    Ok(())
}

pub async fn set_budget(
    service: &FinanceService,
    owner: UserId,
    month_str: &str,
    category: &str,
    amount_cents: Cents,
) -> Result<()> {
    service
        .create_budget(
            owner,
            NewBudget {
                month: parse_month(month_str),
                category: category.to_string(),
                amount_cents,
                description: None,
            },
        )
        .await?;
    Ok(())
}
