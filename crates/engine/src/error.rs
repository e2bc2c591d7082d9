//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidUsername`] returned when a dashboard owner name is malformed.
//! - [`InvalidExpense`] returned when an expense cannot be split.
//! - [`AmountOverflow`] returned when totals no longer fit in cents.
//! - [`StoreUnavailable`] returned by stores that cannot be reached.
//!
//!  [`InvalidUsername`]: EngineError::InvalidUsername
//!  [`InvalidExpense`]: EngineError::InvalidExpense
//!  [`AmountOverflow`]: EngineError::AmountOverflow
//!  [`StoreUnavailable`]: EngineError::StoreUnavailable
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidUsername(a), Self::InvalidUsername(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidExpense(a), Self::InvalidExpense(b)) => a == b,
            (Self::AmountOverflow(a), Self::AmountOverflow(b)) => a == b,
            (Self::StoreUnavailable(a), Self::StoreUnavailable(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
