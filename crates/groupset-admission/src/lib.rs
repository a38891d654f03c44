//! groupset-admission: structural checks run before a group set is stored.
//!
//! Rejections are not retryable: the submitter has to change the object.
//! A partition larger than the replica count is accepted under the default
//! [`PartitionPolicy`](groupset_rollout::PartitionPolicy) and reported as a
//! warning, since the planner treats it as a paused rollout.

pub mod error;
pub mod validate;

pub use error::{AdmissionError, AdmissionResult, NEGATIVE_PARTITION_MESSAGE};
pub use validate::{Validator, Warnings, validate_create, validate_partition};
