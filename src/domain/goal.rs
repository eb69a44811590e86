use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, UserId};

pub type GoalId = Uuid;

/// A savings goal: a target amount, the amount saved so far, and an
/// optional deadline. Progress is updated by the owner, never derived
/// from transaction activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub owner: UserId,
    pub title: String,
    pub target_cents: Cents,
    pub current_cents: Cents,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(owner: UserId, title: impl Into<String>, target_cents: Cents) -> Self {
        assert!(target_cents > 0, "Goal target must be positive");
        Self {
            id: Uuid::new_v4(),
            owner,
            title: title.into(),
            target_cents,
            current_cents: 0,
            deadline: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_current(mut self, current_cents: Cents) -> Self {
        self.current_cents = current_cents;
        self
    }

    pub fn is_reached(&self) -> bool {
        self.current_cents >= self.target_cents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_progress() {
        let goal = Goal::new(Uuid::new_v4(), "Emergency fund", 100000).with_current(25000);
        assert!(!goal.is_reached());

        let done = goal.with_current(100000);
        assert!(done.is_reached());
    }
}
