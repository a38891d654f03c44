//! Admission error types.

use thiserror::Error;

/// Literal rejection message for negative partitions.
pub const NEGATIVE_PARTITION_MESSAGE: &str = "partition must be greater than or equal to 0";

/// A submission was rejected. Not retryable; the submitter must fix it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("{}", NEGATIVE_PARTITION_MESSAGE)]
    NegativePartition,

    #[error("{}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl AdmissionError {
    /// Every violation carried by this error.
    pub fn violations(&self) -> Vec<String> {
        match self {
            AdmissionError::NegativePartition => vec![NEGATIVE_PARTITION_MESSAGE.to_string()],
            AdmissionError::Invalid(all) => all.clone(),
        }
    }
}

pub type AdmissionResult<T> = Result<T, AdmissionError>;
