//! Error types for shift-planner operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Date is in the past: {0}")]
    PastDate(String),

    #[error("Date is beyond the current week: {0}")]
    OutOfRange(String),

    #[error("No matching shift: {0}")]
    NoMatchingShift(String),

    #[error("Invalid shift: {0}")]
    InvalidShift(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
