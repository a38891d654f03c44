//! Planner error types.

use thiserror::Error;

/// Malformed planner input. Admission should make these unreachable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("replicas must not be negative, got {0}")]
    NegativeReplicas(i32),

    #[error("group size must be at least 1, got {0}")]
    InvalidGroupSize(i32),

    #[error("partition must not be negative, got {0}")]
    NegativePartition(i32),

    #[error("{field} resolved to a negative budget ({value})")]
    NegativeBudget { field: &'static str, value: i32 },
}

pub type PlanResult<T> = Result<T, PlanError>;
