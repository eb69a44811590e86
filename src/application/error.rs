use thiserror::Error;

use crate::domain::{Month, ReconcileError};

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-range caller input, reported before data access
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid caller identity, reported before data access
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("A budget for '{category}' already exists in {month}")]
    DuplicateBudget { month: Month, category: String },

    /// An upstream invariant was violated; not a bad request
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        AppError::DataIntegrity(err.to_string())
    }
}
