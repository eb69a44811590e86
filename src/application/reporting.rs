use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{BudgetLine, Cents, Month};

/// The full monthly report: summary totals, per-category expense
/// breakdown, and the budget-vs-actual table. Recomputed from source data
/// on every request; never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub month: Month,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub net: Cents,
    pub category_breakdown: HashMap<String, Cents>,
    pub budget_vs_actual: Vec<BudgetLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: Month,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub net: Cents,
}

/// Per-month income/expense series over an inclusive month range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsReport {
    pub from: Month,
    pub to: Month,
    pub months: Vec<MonthSummary>,
}
