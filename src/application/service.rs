use chrono::NaiveDate;

use crate::domain::{
    Budget, BudgetId, Cents, DateWindow, Goal, GoalId, Month, Session, Transaction, TransactionId,
    TransactionKind, User, UserId, aggregate_by_category, monthly_flows, reconcile, sum_by_kind,
    MAX_DESCRIPTION_LEN,
};
use crate::storage::Repository;

use super::{AppError, MonthSummary, MonthlyReport, TrendsReport};

/// Application service providing high-level operations for the tracker.
/// This is the primary interface for any client (HTTP API, CLI, tests).
///
/// Every operation takes the owning user explicitly; there is no implicit
/// session scope, so the authorization boundary is visible and testable
/// without the HTTP layer.
pub struct FinanceService {
    repo: Repository,
}

/// Fields accepted when recording a transaction.
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub amount_cents: Cents,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Partial update for a transaction; absent fields are left unchanged.
#[derive(Default)]
pub struct UpdateTransaction {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub amount_cents: Option<Cents>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

/// Filter for listing transactions.
#[derive(Default)]
pub struct TransactionFilter {
    pub month: Option<Month>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
}

pub struct NewBudget {
    pub month: Month,
    pub category: String,
    pub amount_cents: Cents,
    pub description: Option<String>,
}

#[derive(Default)]
pub struct UpdateBudget {
    pub month: Option<Month>,
    pub category: Option<String>,
    pub amount_cents: Option<Cents>,
    pub description: Option<Option<String>>,
}

pub struct NewGoal {
    pub title: String,
    pub target_cents: Cents,
    pub current_cents: Option<Cents>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Default)]
pub struct UpdateGoal {
    pub title: Option<String>,
    pub target_cents: Option<Cents>,
    pub current_cents: Option<Cents>,
    pub deadline: Option<Option<NaiveDate>>,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FinanceService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Auth operations
    // ========================

    /// Register a new account and open a session for it.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, Session), AppError> {
        validate_name(name)?;
        validate_email(email)?;
        validate_password(password)?;

        if self.repo.get_user_by_email(email).await?.is_some() {
            return Err(AppError::Validation(
                "Email is already registered".to_string(),
            ));
        }

        let user = User::new(name.to_string(), email.to_string(), password);
        self.repo.save_user(&user).await?;

        let session = Session::new(user.id);
        self.repo.save_session(&session).await?;

        Ok((user, session))
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Session), AppError> {
        // One message for both failure modes so accounts can't be enumerated
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .repo
            .get_user_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !user.verify_password(password) {
            return Err(invalid());
        }

        let session = Session::new(user.id);
        self.repo.save_session(&session).await?;

        Ok((user, session))
    }

    /// Resolve a bearer token to the user it belongs to.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        self.repo
            .get_session_user(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))
    }

    /// Get a user's profile.
    pub async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        self.repo
            .get_user(id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    /// Update the caller's own profile.
    pub async fn update_profile(&self, owner: UserId, update: UpdateProfile) -> Result<User, AppError> {
        let mut user = self.get_user(owner).await?;

        if let Some(name) = update.name {
            validate_name(&name)?;
            user.name = name;
        }
        if let Some(email) = update.email {
            validate_email(&email)?;
            if email != user.email && self.repo.get_user_by_email(&email).await?.is_some() {
                return Err(AppError::Validation(
                    "Email is already registered".to_string(),
                ));
            }
            user.email = email;
        }
        if let Some(password) = update.password {
            validate_password(&password)?;
            user.set_password(&password);
        }

        self.repo.update_user(&user).await?;
        Ok(user)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a new transaction for the owner.
    pub async fn create_transaction(
        &self,
        owner: UserId,
        new: NewTransaction,
    ) -> Result<Transaction, AppError> {
        validate_category(&new.category)?;
        validate_amount(new.amount_cents)?;
        validate_description(new.description.as_deref())?;

        let mut transaction =
            Transaction::new(owner, new.kind, new.category, new.amount_cents, new.date);
        if let Some(description) = new.description {
            transaction = transaction.with_description(description);
        }

        self.repo.save_transaction(&transaction).await?;
        Ok(transaction)
    }

    /// List the owner's transactions, newest first, optionally filtered.
    pub async fn list_transactions(
        &self,
        owner: UserId,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        let window = filter.month.map(DateWindow::month);
        Ok(self
            .repo
            .list_transactions(
                owner,
                window.map(|w| w.from),
                window.map(|w| w.to),
                filter.kind,
                filter.category.as_deref(),
            )
            .await?)
    }

    /// Update one of the owner's transactions.
    pub async fn update_transaction(
        &self,
        owner: UserId,
        id: TransactionId,
        update: UpdateTransaction,
    ) -> Result<Transaction, AppError> {
        let mut transaction = self
            .repo
            .get_transaction(owner, id)
            .await?
            .ok_or(AppError::NotFound("Transaction"))?;

        if let Some(kind) = update.kind {
            transaction.kind = kind;
        }
        if let Some(category) = update.category {
            validate_category(&category)?;
            transaction.category = category;
        }
        if let Some(amount_cents) = update.amount_cents {
            validate_amount(amount_cents)?;
            transaction.amount_cents = amount_cents;
        }
        if let Some(description) = update.description {
            validate_description(description.as_deref())?;
            transaction.description = description;
        }
        if let Some(date) = update.date {
            transaction.date = date;
        }

        self.repo.update_transaction(&transaction).await?;
        Ok(transaction)
    }

    /// Delete one of the owner's transactions. Budgets are unaffected.
    pub async fn delete_transaction(&self, owner: UserId, id: TransactionId) -> Result<(), AppError> {
        let deleted = self.repo.delete_transaction(owner, id).await?;
        if !deleted {
            return Err(AppError::NotFound("Transaction"));
        }
        Ok(())
    }

    // ========================
    // Budget operations
    // ========================

    /// Create a budget entry. At most one may exist per
    /// (owner, month, category); duplicates are rejected here, before the
    /// store's UNIQUE constraint ever fires.
    pub async fn create_budget(&self, owner: UserId, new: NewBudget) -> Result<Budget, AppError> {
        validate_category(&new.category)?;
        validate_amount(new.amount_cents)?;

        if self
            .repo
            .get_budget_for_month_category(owner, new.month, &new.category)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateBudget {
                month: new.month,
                category: new.category,
            });
        }

        let mut budget = Budget::new(owner, new.month, new.category, new.amount_cents);
        if let Some(description) = new.description {
            budget = budget.with_description(description);
        }

        self.repo.save_budget(&budget).await?;
        Ok(budget)
    }

    /// List the owner's budgets, optionally restricted to one month.
    pub async fn list_budgets(
        &self,
        owner: UserId,
        month: Option<Month>,
    ) -> Result<Vec<Budget>, AppError> {
        Ok(self.repo.list_budgets(owner, month).await?)
    }

    /// Update one of the owner's budgets, preserving uniqueness when the
    /// month or category changes.
    pub async fn update_budget(
        &self,
        owner: UserId,
        id: BudgetId,
        update: UpdateBudget,
    ) -> Result<Budget, AppError> {
        let mut budget = self
            .repo
            .get_budget(owner, id)
            .await?
            .ok_or(AppError::NotFound("Budget"))?;

        if let Some(month) = update.month {
            budget.month = month;
        }
        if let Some(category) = update.category {
            validate_category(&category)?;
            budget.category = category;
        }
        if let Some(amount_cents) = update.amount_cents {
            validate_amount(amount_cents)?;
            budget.amount_cents = amount_cents;
        }
        if let Some(description) = update.description {
            budget.description = description;
        }

        if let Some(existing) = self
            .repo
            .get_budget_for_month_category(owner, budget.month, &budget.category)
            .await?
        {
            if existing.id != budget.id {
                return Err(AppError::DuplicateBudget {
                    month: budget.month,
                    category: budget.category,
                });
            }
        }

        self.repo.update_budget(&budget).await?;
        Ok(budget)
    }

    /// Delete one of the owner's budgets. Transactions are unaffected.
    pub async fn delete_budget(&self, owner: UserId, id: BudgetId) -> Result<(), AppError> {
        let deleted = self.repo.delete_budget(owner, id).await?;
        if !deleted {
            return Err(AppError::NotFound("Budget"));
        }
        Ok(())
    }

    // ========================
    // Goal operations
    // ========================

    /// Create a savings goal.
    pub async fn create_goal(&self, owner: UserId, new: NewGoal) -> Result<Goal, AppError> {
        if new.title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        validate_amount(new.target_cents)?;
        let current = new.current_cents.unwrap_or(0);
        if current < 0 {
            return Err(AppError::Validation(
                "Current amount must not be negative".to_string(),
            ));
        }

        let mut goal = Goal::new(owner, new.title, new.target_cents).with_current(current);
        if let Some(deadline) = new.deadline {
            goal = goal.with_deadline(deadline);
        }

        self.repo.save_goal(&goal).await?;
        Ok(goal)
    }

    /// List the owner's goals.
    pub async fn list_goals(&self, owner: UserId) -> Result<Vec<Goal>, AppError> {
        Ok(self.repo.list_goals(owner).await?)
    }

    /// Update one of the owner's goals.
    pub async fn update_goal(
        &self,
        owner: UserId,
        id: GoalId,
        update: UpdateGoal,
    ) -> Result<Goal, AppError> {
        let mut goal = self
            .repo
            .get_goal(owner, id)
            .await?
            .ok_or(AppError::NotFound("Goal"))?;

        if let Some(title) = update.title {
            if title.is_empty() {
                return Err(AppError::Validation("Title is required".to_string()));
            }
            goal.title = title;
        }
        if let Some(target_cents) = update.target_cents {
            validate_amount(target_cents)?;
            goal.target_cents = target_cents;
        }
        if let Some(current_cents) = update.current_cents {
            if current_cents < 0 {
                return Err(AppError::Validation(
                    "Current amount must not be negative".to_string(),
                ));
            }
            goal.current_cents = current_cents;
        }
        if let Some(deadline) = update.deadline {
            goal.deadline = deadline;
        }

        self.repo.update_goal(&goal).await?;
        Ok(goal)
    }

    /// Delete one of the owner's goals.
    pub async fn delete_goal(&self, owner: UserId, id: GoalId) -> Result<(), AppError> {
        let deleted = self.repo.delete_goal(owner, id).await?;
        if !deleted {
            return Err(AppError::NotFound("Goal"));
        }
        Ok(())
    }

    // ========================
    // Reporting operations
    // ========================

    /// Assemble the monthly report: fetch the owner's transactions and
    /// budgets for the month, aggregate, and reconcile. Read-only; empty
    /// data yields a zeroed payload, not an error.
    pub async fn build_monthly_report(
        &self,
        owner: UserId,
        month: Month,
    ) -> Result<MonthlyReport, AppError> {
        let window = DateWindow::month(month);

        let transactions = self
            .repo
            .list_transactions(owner, Some(window.from), Some(window.to), None, None)
            .await?;
        let budgets = self.repo.list_budgets(owner, Some(month)).await?;

        let total_income = sum_by_kind(&transactions, TransactionKind::Income, window);
        let total_expense = sum_by_kind(&transactions, TransactionKind::Expense, window);
        let category_breakdown =
            aggregate_by_category(&transactions, TransactionKind::Expense, window);
        let budget_vs_actual = reconcile(&budgets, &category_breakdown)?;

        Ok(MonthlyReport {
            month,
            total_income,
            total_expense,
            net: total_income - total_expense,
            category_breakdown,
            budget_vs_actual,
        })
    }

    /// Per-month income/expense totals over an inclusive month range.
    pub async fn trends(
        &self,
        owner: UserId,
        from: Month,
        to: Month,
    ) -> Result<TrendsReport, AppError> {
        if from > to {
            return Err(AppError::Validation(
                "Month range start must not be after its end".to_string(),
            ));
        }

        let transactions = self
            .repo
            .list_transactions(owner, Some(from.first_day()), Some(to.last_day()), None, None)
            .await?;

        let months = monthly_flows(&transactions, from, to)
            .into_iter()
            .map(|flow| MonthSummary {
                month: flow.month,
                total_income: flow.income,
                total_expense: flow.expense,
                net: flow.income - flow.expense,
            })
            .collect();

        Ok(TrendsReport { from, to, months })
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if category.is_empty() {
        return Err(AppError::Validation("Category is required".to_string()));
    }
    Ok(())
}

fn validate_amount(amount_cents: Cents) -> Result<(), AppError> {
    if amount_cents <= 0 {
        return Err(AppError::Validation(
            "Amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), AppError> {
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::Validation(format!(
                "Description must be {} characters or less",
                MAX_DESCRIPTION_LEN
            )));
        }
    }
    Ok(())
}
