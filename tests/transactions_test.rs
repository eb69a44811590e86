mod common;

use anyhow::Result;
use common::{
    other_user, parse_date, parse_month, record_expense, record_income, test_service, test_user,
};
use fiscus::application::{AppError, NewTransaction, TransactionFilter, UpdateTransaction};
use fiscus::domain::TransactionKind;

#[tokio::test]
async fn test_transaction_create_and_list() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    let created = service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: "Food".to_string(),
                amount_cents: 4000,
                description: Some("weekly groceries".to_string()),
                date: parse_date("2024-03-05"),
            },
        )
        .await?;

    assert_eq!(created.amount_cents, 4000);
    assert_eq!(created.description, Some("weekly groceries".to_string()));

    record_income(&service, owner, "Salary", 200000, "2024-03-01").await?;

    let transactions = service
        .list_transactions(owner, TransactionFilter::default())
        .await?;
    assert_eq!(transactions.len(), 2);

    // Newest first
    assert_eq!(transactions[0].date, parse_date("2024-03-05"));
    assert_eq!(transactions[1].date, parse_date("2024-03-01"));

    Ok(())
}

#[tokio::test]
async fn test_transaction_validation() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    let err = service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: "Food".to_string(),
                amount_cents: 0,
                description: None,
                date: parse_date("2024-03-05"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: String::new(),
                amount_cents: 4000,
                description: None,
                date: parse_date("2024-03-05"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: "Food".to_string(),
                amount_cents: 4000,
                description: Some("x".repeat(101)),
                date: parse_date("2024-03-05"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // 100 characters is still accepted
    service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: "Food".to_string(),
                amount_cents: 4000,
                description: Some("x".repeat(100)),
                date: parse_date("2024-03-05"),
            },
        )
        .await?;

    Ok(())
}

#[tokio::test]
async fn test_transaction_list_filters() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    record_expense(&service, owner, "Food", 4000, "2024-03-05").await?;
    record_expense(&service, owner, "Rent", 80000, "2024-03-01").await?;
    record_expense(&service, owner, "Food", 2000, "2024-04-02").await?;
    record_income(&service, owner, "Salary", 200000, "2024-03-01").await?;

    let march = service
        .list_transactions(
            owner,
            TransactionFilter {
                month: Some(parse_month("2024-03")),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(march.len(), 3);

    let expenses = service
        .list_transactions(
            owner,
            TransactionFilter {
                kind: Some(TransactionKind::Expense),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(expenses.len(), 3);

    let food = service
        .list_transactions(
            owner,
            TransactionFilter {
                category: Some("Food".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(food.len(), 2);

    // Category filtering is exact-match, case included
    let lowercase = service
        .list_transactions(
            owner,
            TransactionFilter {
                category: Some("food".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert!(lowercase.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_transaction_update() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    let created = service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: "Food".to_string(),
                amount_cents: 4000,
                description: None,
                date: parse_date("2024-03-05"),
            },
        )
        .await?;

    let updated = service
        .update_transaction(
            owner,
            created.id,
            UpdateTransaction {
                amount_cents: Some(4500),
                category: Some("Dining".to_string()),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.amount_cents, 4500);
    assert_eq!(updated.category, "Dining");
    // Untouched fields survive
    assert_eq!(updated.kind, TransactionKind::Expense);
    assert_eq!(updated.date, parse_date("2024-03-05"));

    Ok(())
}

#[tokio::test]
async fn test_transaction_delete() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    let created = service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: "Food".to_string(),
                amount_cents: 4000,
                description: None,
                date: parse_date("2024-03-05"),
            },
        )
        .await?;

    service.delete_transaction(owner, created.id).await?;

    let remaining = service
        .list_transactions(owner, TransactionFilter::default())
        .await?;
    assert!(remaining.is_empty());

    let err = service
        .delete_transaction(owner, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_transaction_owner_isolation() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;
    let stranger = other_user(&service).await?;

    let created = service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: "Food".to_string(),
                amount_cents: 4000,
                description: None,
                date: parse_date("2024-03-05"),
            },
        )
        .await?;

    assert!(
        service
            .list_transactions(stranger, TransactionFilter::default())
            .await?
            .is_empty()
    );

    let err = service
        .update_transaction(
            stranger,
            created.id,
            UpdateTransaction {
                amount_cents: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service
        .delete_transaction(stranger, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // The record is still there for its owner
    assert_eq!(
        service
            .list_transactions(owner, TransactionFilter::default())
            .await?
            .len(),
        1
    );

    Ok(())
}

#[tokio::test]
async fn test_deleting_transaction_leaves_budgets_alone() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    let created = service
        .create_transaction(
            owner,
            NewTransaction {
                kind: TransactionKind::Expense,
                category: "Food".to_string(),
                amount_cents: 4000,
                description: None,
                date: parse_date("2024-03-05"),
            },
        )
        .await?;
    common::set_budget(&service, owner, "2024-03", "Food", 10000).await?;

    service.delete_transaction(owner, created.id).await?;

    let budgets = service.list_budgets(owner, None).await?;
    assert_eq!(budgets.len(), 1);

    let report = service
        .build_monthly_report(owner, parse_month("2024-03"))
        .await?;
    assert_eq!(report.budget_vs_actual[0].actual, 0);
    assert_eq!(report.budget_vs_actual[0].remaining, 10000);

    Ok(())
}
