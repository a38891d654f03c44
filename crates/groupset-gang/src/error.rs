//! Synchronizer error types.

use std::time::Duration;

use thiserror::Error;

/// Errors returned to the reconcile loop. All of them are retryable with
/// freshly observed state except `Unit`, which needs corrected labels.
#[derive(Debug, Error)]
pub enum GangError {
    #[error("leader unit metadata: {0}")]
    Unit(#[from] groupset_core::CoreError),

    #[error("state store error: {0}")]
    Store(#[from] groupset_state::StateError),

    /// The caller stopped waiting. A create that had already started
    /// still commits or aborts as a whole; a retry then reports `Existing`.
    #[error("constraint group sync exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    /// The deadline passed before the create started, so it was skipped.
    #[error("constraint group sync abandoned after its deadline")]
    Abandoned,

    #[error("constraint group sync task failed: {0}")]
    Join(String),
}

pub type GangResult<T> = Result<T, GangError>;
