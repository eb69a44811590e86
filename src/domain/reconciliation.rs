use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Budget, Cents};

/// One row of the budget-vs-actual table: a month's target for a category
/// paired with the actual spend aggregated for the same month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: String,
    pub budgeted: Cents,
    pub actual: Cents,
    /// budgeted - actual; negative on overspend, never clamped
    pub remaining: Cents,
}

/// Join budget entries for one month against per-category actual spend.
///
/// The join is budget-anchored: categories with spend but no budget entry
/// are not reported here (they still show up in the category breakdown).
/// Output is sorted by category label for deterministic rendering.
///
/// Duplicate categories in `budgets` violate the store's uniqueness
/// invariant; they are rejected rather than summed or overwritten.
pub fn reconcile(
    budgets: &[Budget],
    actuals: &HashMap<String, Cents>,
) -> Result<Vec<BudgetLine>, ReconcileError> {
    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(budgets.len());

    for budget in budgets {
        if !seen.insert(budget.category.as_str()) {
            return Err(ReconcileError::DuplicateCategory {
                category: budget.category.clone(),
            });
        }
        let actual = actuals.get(&budget.category).copied().unwrap_or(0);
        lines.push(BudgetLine {
            category: budget.category.clone(),
            budgeted: budget.amount_cents,
            actual,
            remaining: budget.amount_cents - actual,
        });
    }

    lines.sort_by(|a, b| a.category.cmp(&b.category));
    Ok(lines)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Two budget entries share a category within one month
    DuplicateCategory { category: String },
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileError::DuplicateCategory { category } => {
                write!(f, "duplicate budget entries for category '{}'", category)
            }
        }
    }
}

impl std::error::Error for ReconcileError {}
