use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Budget, BudgetId, Goal, GoalId, Month, Session, Transaction, TransactionId, TransactionKind,
    User, UserId,
};

use super::MIGRATION_001_INITIAL;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for persisting and querying users, transactions, budgets
/// and goals. Every read and write is scoped to an owning user.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // User operations
    // ========================

    /// Save a new user to the database.
    pub async fn save_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, salt, password_digest, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.salt)
        .bind(&user.password_digest)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save user")?;
        Ok(())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, salt, password_digest, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, salt, password_digest, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Update an existing user's profile fields.
    pub async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, salt = ?, password_digest = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.salt)
        .bind(&user.password_digest)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update user")?;
        Ok(())
    }

    // ========================
    // Session operations
    // ========================

    /// Save a new session token.
    pub async fn save_session(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&session.token)
        .bind(session.user.to_string())
        .bind(session.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save session")?;
        Ok(())
    }

    /// Resolve a session token to its user in one query.
    pub async fn get_session_user(&self, token: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.salt, u.password_digest, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to resolve session")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(User {
            id: Uuid::parse_str(&id_str).context("Invalid user ID")?,
            name: row.get("name"),
            email: row.get("email"),
            salt: row.get("salt"),
            password_digest: row.get("password_digest"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// Save a new transaction to the database.
    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, kind, category, amount_cents, description, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.owner.to_string())
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.amount_cents)
        .bind(&transaction.description)
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(transaction.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;
        Ok(())
    }

    /// Get one of the owner's transactions by ID.
    pub async fn get_transaction(
        &self,
        owner: UserId,
        id: TransactionId,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, kind, category, amount_cents, description, date, created_at
            FROM transactions
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    /// List the owner's transactions with optional filters, newest first.
    /// Date bounds are inclusive on both ends.
    pub async fn list_transactions(
        &self,
        owner: UserId,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        kind: Option<TransactionKind>,
        category: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        // Build query dynamically based on filters
        let mut query = String::from(
            "SELECT id, user_id, kind, category, amount_cents, description, date, created_at FROM transactions WHERE user_id = ?"
        );

        let from_str = from_date.map(|d| d.format(DATE_FORMAT).to_string());
        let to_str = to_date.map(|d| d.format(DATE_FORMAT).to_string());

        if from_str.is_some() {
            query.push_str(" AND date >= ?");
        }
        if to_str.is_some() {
            query.push_str(" AND date <= ?");
        }
        if kind.is_some() {
            query.push_str(" AND kind = ?");
        }
        if category.is_some() {
            query.push_str(" AND category = ?");
        }

        query.push_str(" ORDER BY date DESC, created_at DESC");

        let mut sql_query = sqlx::query(&query).bind(owner.to_string());

        if let Some(ref from) = from_str {
            sql_query = sql_query.bind(from);
        }
        if let Some(ref to) = to_str {
            sql_query = sql_query.bind(to);
        }
        if let Some(kind) = kind {
            sql_query = sql_query.bind(kind.as_str());
        }
        if let Some(category) = category {
            sql_query = sql_query.bind(category);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Update an existing transaction.
    pub async fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET kind = ?, category = ?, amount_cents = ?, description = ?, date = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.amount_cents)
        .bind(&transaction.description)
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(transaction.id.to_string())
        .bind(transaction.owner.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update transaction")?;
        Ok(())
    }

    /// Delete one of the owner's transactions.
    /// Returns false when no matching row exists.
    pub async fn delete_transaction(&self, owner: UserId, id: TransactionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("user_id");
        let kind_str: String = row.get("kind");
        let date_str: String = row.get("date");
        let created_at_str: String = row.get("created_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            owner: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            category: row.get("category"),
            amount_cents: row.get("amount_cents"),
            description: row.get("description"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .context("Invalid transaction date")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Budget operations
    // ========================

    /// Save a new budget to the database.
    pub async fn save_budget(&self, budget: &Budget) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (id, user_id, month, category, amount_cents, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(budget.id.to_string())
        .bind(budget.owner.to_string())
        .bind(budget.month.to_string())
        .bind(&budget.category)
        .bind(budget.amount_cents)
        .bind(&budget.description)
        .bind(budget.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save budget")?;
        Ok(())
    }

    /// Get one of the owner's budgets by ID.
    pub async fn get_budget(&self, owner: UserId, id: BudgetId) -> Result<Option<Budget>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, month, category, amount_cents, description, created_at
            FROM budgets
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch budget")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_budget(&row)?)),
            None => Ok(None),
        }
    }

    /// Get the owner's budget for one (month, category) pair, if any.
    /// Backs the uniqueness check at creation time.
    pub async fn get_budget_for_month_category(
        &self,
        owner: UserId,
        month: Month,
        category: &str,
    ) -> Result<Option<Budget>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, month, category, amount_cents, description, created_at
            FROM budgets
            WHERE user_id = ? AND month = ? AND category = ?
            "#,
        )
        .bind(owner.to_string())
        .bind(month.to_string())
        .bind(category)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch budget by month and category")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_budget(&row)?)),
            None => Ok(None),
        }
    }

    /// List the owner's budgets, optionally restricted to one month,
    /// ordered by month then category.
    pub async fn list_budgets(&self, owner: UserId, month: Option<Month>) -> Result<Vec<Budget>> {
        let rows = match month {
            Some(month) => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, month, category, amount_cents, description, created_at
                    FROM budgets
                    WHERE user_id = ? AND month = ?
                    ORDER BY category
                    "#,
                )
                .bind(owner.to_string())
                .bind(month.to_string())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, month, category, amount_cents, description, created_at
                    FROM budgets
                    WHERE user_id = ?
                    ORDER BY month DESC, category
                    "#,
                )
                .bind(owner.to_string())
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Failed to list budgets")?;

        rows.iter().map(Self::row_to_budget).collect()
    }

    /// Update an existing budget.
    pub async fn update_budget(&self, budget: &Budget) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE budgets
            SET month = ?, category = ?, amount_cents = ?, description = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(budget.month.to_string())
        .bind(&budget.category)
        .bind(budget.amount_cents)
        .bind(&budget.description)
        .bind(budget.id.to_string())
        .bind(budget.owner.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update budget")?;
        Ok(())
    }

    /// Delete one of the owner's budgets.
    /// Returns false when no matching row exists.
    pub async fn delete_budget(&self, owner: UserId, id: BudgetId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete budget")?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_budget(row: &sqlx::sqlite::SqliteRow) -> Result<Budget> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("user_id");
        let month_str: String = row.get("month");
        let created_at_str: String = row.get("created_at");

        Ok(Budget {
            id: Uuid::parse_str(&id_str).context("Invalid budget ID")?,
            owner: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            month: month_str
                .parse::<Month>()
                .map_err(|_| anyhow::anyhow!("Invalid budget month: {}", month_str))?,
            category: row.get("category"),
            amount_cents: row.get("amount_cents"),
            description: row.get("description"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Goal operations
    // ========================

    /// Save a new goal to the database.
    pub async fn save_goal(&self, goal: &Goal) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO goals (id, user_id, title, target_cents, current_cents, deadline, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(goal.id.to_string())
        .bind(goal.owner.to_string())
        .bind(&goal.title)
        .bind(goal.target_cents)
        .bind(goal.current_cents)
        .bind(goal.deadline.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(goal.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save goal")?;
        Ok(())
    }

    /// Get one of the owner's goals by ID.
    pub async fn get_goal(&self, owner: UserId, id: GoalId) -> Result<Option<Goal>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, target_cents, current_cents, deadline, created_at
            FROM goals
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch goal")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_goal(&row)?)),
            None => Ok(None),
        }
    }

    /// List the owner's goals, oldest first.
    pub async fn list_goals(&self, owner: UserId) -> Result<Vec<Goal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, target_cents, current_cents, deadline, created_at
            FROM goals
            WHERE user_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list goals")?;

        rows.iter().map(Self::row_to_goal).collect()
    }

    /// Update an existing goal.
    pub async fn update_goal(&self, goal: &Goal) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE goals
            SET title = ?, target_cents = ?, current_cents = ?, deadline = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&goal.title)
        .bind(goal.target_cents)
        .bind(goal.current_cents)
        .bind(goal.deadline.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(goal.id.to_string())
        .bind(goal.owner.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update goal")?;
        Ok(())
    }

    /// Delete one of the owner's goals.
    /// Returns false when no matching row exists.
    pub async fn delete_goal(&self, owner: UserId, id: GoalId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete goal")?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_goal(row: &sqlx::sqlite::SqliteRow) -> Result<Goal> {
        let id_str: String = row.get("id");
        let owner_str: String = row.get("user_id");
        let deadline_str: Option<String> = row.get("deadline");
        let created_at_str: String = row.get("created_at");

        Ok(Goal {
            id: Uuid::parse_str(&id_str).context("Invalid goal ID")?,
            owner: Uuid::parse_str(&owner_str).context("Invalid owner ID")?,
            title: row.get("title"),
            target_cents: row.get("target_cents"),
            current_cents: row.get("current_cents"),
            deadline: deadline_str
                .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT))
                .transpose()
                .context("Invalid goal deadline")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
