use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Month, UserId};

pub type BudgetId = Uuid;

/// A spending target for one category in one calendar month.
/// At most one budget may exist per (owner, month, category); the store
/// rejects duplicates at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub owner: UserId,
    pub month: Month,
    pub category: String,
    /// Target amount in cents (always positive)
    pub amount_cents: Cents,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(
        owner: UserId,
        month: Month,
        category: impl Into<String>,
        amount_cents: Cents,
    ) -> Self {
        assert!(amount_cents > 0, "Budget amount must be positive");
        Self {
            id: Uuid::new_v4(),
            owner,
            month,
            category: category.into(),
            amount_cents,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_budget() {
        let owner = Uuid::new_v4();
        let month: Month = "2024-03".parse().unwrap();
        let budget = Budget::new(owner, month, "Food", 10000).with_description("monthly food cap");

        assert_eq!(budget.owner, owner);
        assert_eq!(budget.month, month);
        assert_eq!(budget.category, "Food");
        assert_eq!(budget.amount_cents, 10000);
        assert_eq!(budget.description, Some("monthly food cap".to_string()));
    }

    #[test]
    #[should_panic(expected = "Budget amount must be positive")]
    fn test_budget_requires_positive_amount() {
        let month: Month = "2024-03".parse().unwrap();
        Budget::new(Uuid::new_v4(), month, "Food", 0);
    }
}
