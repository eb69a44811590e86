mod common;

use anyhow::Result;
use common::{
    other_user, parse_month, record_expense, record_income, set_budget, test_service, test_user,
};
use fiscus::domain::Cents;

#[tokio::test]
async fn test_monthly_report_end_to_end() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    record_expense(&service, owner, "Food", 4000, "2024-03-05").await?;
    record_expense(&service, owner, "Food", 1000, "2024-03-20").await?;
    record_income(&service, owner, "Salary", 200000, "2024-03-01").await?;
    set_budget(&service, owner, "2024-03", "Food", 10000).await?;

    let report = service
        .build_monthly_report(owner, parse_month("2024-03"))
        .await?;

    assert_eq!(report.total_income, 200000);
    assert_eq!(report.total_expense, 5000);
    assert_eq!(report.net, 195000);

    assert_eq!(report.category_breakdown.len(), 1);
    assert_eq!(report.category_breakdown["Food"], 5000);

    assert_eq!(report.budget_vs_actual.len(), 1);
    let line = &report.budget_vs_actual[0];
    assert_eq!(line.category, "Food");
    assert_eq!(line.budgeted, 10000);
    assert_eq!(line.actual, 5000);
    assert_eq!(line.remaining, 5000);

    Ok(())
}

#[tokio::test]
async fn test_monthly_report_with_no_data() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    let report = service
        .build_monthly_report(owner, parse_month("2024-03"))
        .await?;

    assert_eq!(report.total_income, 0);
    assert_eq!(report.total_expense, 0);
    assert_eq!(report.net, 0);
    assert!(report.category_breakdown.is_empty());
    assert!(report.budget_vs_actual.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_budget_vs_actual_is_budget_anchored() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    // Budgeted category with spend, plus unbudgeted spending
    record_expense(&service, owner, "Food", 3000, "2024-03-05").await?;
    record_expense(&service, owner, "Impulse", 9900, "2024-03-09").await?;
    set_budget(&service, owner, "2024-03", "Food", 10000).await?;

    let report = service
        .build_monthly_report(owner, parse_month("2024-03"))
        .await?;

    // Unbudgeted spending shows up in the breakdown...
    assert_eq!(report.category_breakdown["Impulse"], 9900);

    // ...but never in the budget-vs-actual table
    assert_eq!(report.budget_vs_actual.len(), 1);
    assert_eq!(report.budget_vs_actual[0].category, "Food");

    Ok(())
}

#[tokio::test]
async fn test_overspend_remaining_goes_negative() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    record_expense(&service, owner, "Food", 15000, "2024-03-10").await?;
    set_budget(&service, owner, "2024-03", "Food", 10000).await?;

    let report = service
        .build_monthly_report(owner, parse_month("2024-03"))
        .await?;

    assert_eq!(report.budget_vs_actual[0].remaining, -5000);

    Ok(())
}

#[tokio::test]
async fn test_report_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    record_expense(&service, owner, "Food", 4000, "2024-03-05").await?;
    record_income(&service, owner, "Salary", 200000, "2024-03-01").await?;
    set_budget(&service, owner, "2024-03", "Food", 10000).await?;

    let month = parse_month("2024-03");
    let first = service.build_monthly_report(owner, month).await?;
    let second = service.build_monthly_report(owner, month).await?;

    assert_eq!(first.total_income, second.total_income);
    assert_eq!(first.total_expense, second.total_expense);
    assert_eq!(first.net, second.net);
    assert_eq!(first.category_breakdown, second.category_breakdown);
    assert_eq!(first.budget_vs_actual, second.budget_vs_actual);

    Ok(())
}

#[tokio::test]
async fn test_report_scopes_to_month_and_owner() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;
    let stranger = other_user(&service).await?;

    // In scope
    record_expense(&service, owner, "Food", 2000, "2024-03-01").await?;
    record_expense(&service, owner, "Food", 3000, "2024-03-31").await?;

    // Out of scope: neighboring months and another owner
    record_expense(&service, owner, "Food", 50000, "2024-02-29").await?;
    record_expense(&service, owner, "Food", 50000, "2024-04-01").await?;
    record_expense(&service, stranger, "Food", 50000, "2024-03-15").await?;

    let report = service
        .build_monthly_report(owner, parse_month("2024-03"))
        .await?;

    assert_eq!(report.total_expense, 5000);
    assert_eq!(report.category_breakdown["Food"], 5000);

    Ok(())
}

#[tokio::test]
async fn test_breakdown_sums_match_expense_total() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    record_expense(&service, owner, "Food", 4000, "2024-03-05").await?;
    record_expense(&service, owner, "Rent", 80000, "2024-03-01").await?;
    record_expense(&service, owner, "Fun", 2500, "2024-03-15").await?;
    record_income(&service, owner, "Salary", 200000, "2024-03-01").await?;

    let report = service
        .build_monthly_report(owner, parse_month("2024-03"))
        .await?;

    let breakdown_total: Cents = report.category_breakdown.values().sum();
    assert_eq!(breakdown_total, report.total_expense);
    assert_eq!(report.total_expense, 86500);

    Ok(())
}

#[tokio::test]
async fn test_categories_stay_case_sensitive() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    record_expense(&service, owner, "Food", 1000, "2024-03-05").await?;
    record_expense(&service, owner, "food", 2000, "2024-03-06").await?;
    set_budget(&service, owner, "2024-03", "Food", 5000).await?;

    let report = service
        .build_monthly_report(owner, parse_month("2024-03"))
        .await?;

    // Differently-cased labels are distinct groups, and only the exact
    // match is reconciled against the budget
    assert_eq!(report.category_breakdown["Food"], 1000);
    assert_eq!(report.category_breakdown["food"], 2000);
    assert_eq!(report.budget_vs_actual[0].actual, 1000);

    Ok(())
}

#[tokio::test]
async fn test_trends_series() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    // January: income 5000.00, expense 3000.00
    record_income(&service, owner, "Salary", 500000, "2024-01-01").await?;
    record_expense(&service, owner, "Rent", 300000, "2024-01-15").await?;

    // February: nothing

    // March: income 6000.00, expense 4000.00
    record_income(&service, owner, "Salary", 600000, "2024-03-01").await?;
    record_expense(&service, owner, "Rent", 400000, "2024-03-15").await?;

    let report = service
        .trends(owner, parse_month("2024-01"), parse_month("2024-03"))
        .await?;

    assert_eq!(report.months.len(), 3);

    let jan = &report.months[0];
    assert_eq!(jan.total_income, 500000);
    assert_eq!(jan.total_expense, 300000);
    assert_eq!(jan.net, 200000);

    let feb = &report.months[1];
    assert_eq!(feb.total_income, 0);
    assert_eq!(feb.total_expense, 0);
    assert_eq!(feb.net, 0);

    let mar = &report.months[2];
    assert_eq!(mar.net, 200000);

    Ok(())
}

#[tokio::test]
async fn test_trends_rejects_inverted_range() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let owner = test_user(&service).await?;

    let result = service
        .trends(owner, parse_month("2024-03"), parse_month("2024-01"))
        .await;

    assert!(matches!(
        result,
        Err(fiscus::application::AppError::Validation(_))
    ));

    Ok(())
}
