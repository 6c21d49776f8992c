//! The module contains the errors the engine can return.
//!
//! The reconciliation errors are:
//!
//! - [`NotFound`] a pledge/member/committee/project reference does not resolve.
//! - [`InvalidAmount`] an amount is `<= 0`.
//! - [`ExceedsPending`] a payment would overshoot the pledge commitment.
//! - [`InvariantViolation`] an edit would break `amount_collected <= amount_total`.
//! - [`TerminalState`] a payment was attempted on a completed/cancelled pledge.
//! - [`Conflict`] the caller's snapshot disagrees with the stored state.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`ExceedsPending`]: EngineError::ExceedsPending
//!  [`InvariantViolation`]: EngineError::InvariantViolation
//!  [`TerminalState`]: EngineError::TerminalState
//!  [`Conflict`]: EngineError::Conflict
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Payment exceeds pending balance: {0}")]
    ExceedsPending(String),
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("Terminal state: {0}")]
    TerminalState(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` when the error comes from the store refusing a write
    /// because another transaction holds the lock.
    pub(crate) fn is_lock_contention(&self) -> bool {
        let Self::Database(err) = self else {
            return false;
        };
        let message = err.to_string().to_lowercase();
        message.contains("database is locked")
            || message.contains("database table is locked")
            || message.contains("deadlock")
            || message.contains("could not serialize access")
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::ExceedsPending(a), Self::ExceedsPending(b)) => a == b,
            (Self::InvariantViolation(a), Self::InvariantViolation(b)) => a == b,
            (Self::TerminalState(a), Self::TerminalState(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
