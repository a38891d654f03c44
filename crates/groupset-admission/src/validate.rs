//! Admission-time checks for group set submissions.
//!
//! Checks are structural only: they look at the submitted object, never at
//! observed groups. A rejection lists every violation found; an accepted
//! submission may still carry warnings for the operator.

use groupset_core::{IntOrPercent, LeaderWorkerGroupSet};
use groupset_rollout::PartitionPolicy;
use tracing::warn;

use crate::error::{AdmissionError, AdmissionResult, NEGATIVE_PARTITION_MESSAGE};

/// Non-blocking notes returned with an accepted submission.
pub type Warnings = Vec<String>;

/// The only structural rule for a partition: it is not negative.
///
/// A partition above the current replica count is accepted; it simply
/// leaves the rollout paused.
pub fn validate_partition(value: i32) -> AdmissionResult<()> {
    if value < 0 {
        return Err(AdmissionError::NegativePartition);
    }
    Ok(())
}

/// Admission checks with a configurable partition policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    pub partition_policy: PartitionPolicy,
}

impl Validator {
    pub fn new(partition_policy: PartitionPolicy) -> Self {
        Self { partition_policy }
    }

    pub fn validate_create(&self, set: &LeaderWorkerGroupSet) -> AdmissionResult<Warnings> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let replicas = set.replicas();
        if replicas < 0 {
            errors.push("replicas must be greater than or equal to 0".to_string());
        }
        if set.group_size() < 1 {
            errors.push("size must be greater than or equal to 1".to_string());
        }

        let partition = set.partition();
        if validate_partition(partition).is_err() {
            errors.push(NEGATIVE_PARTITION_MESSAGE.to_string());
        } else if !self.partition_policy.accepts(partition, replicas) {
            errors.push(format!(
                "partition {partition} must be less than or equal to replicas {replicas}"
            ));
        } else if partition > replicas {
            warnings.push(format!(
                "partition {partition} is greater than replicas {replicas}; \
                 the rollout stays paused until the partition is lowered"
            ));
        }

        let rolling = set.rolling_update();
        check_budget("max_unavailable", rolling.max_unavailable, &mut errors);
        check_budget("max_surge", rolling.max_surge, &mut errors);
        if rolling.max_unavailable.raw() == 0 && rolling.max_surge.raw() == 0 {
            errors.push("max_surge and max_unavailable must not both be 0".to_string());
        }

        if !errors.is_empty() {
            warn!(set = %set.table_key(), violations = errors.len(), "submission rejected");
            return Err(AdmissionError::Invalid(errors));
        }
        for warning in &warnings {
            warn!(set = %set.table_key(), "{warning}");
        }
        Ok(warnings)
    }

    pub fn validate_update(
        &self,
        old: &LeaderWorkerGroupSet,
        new: &LeaderWorkerGroupSet,
    ) -> AdmissionResult<Warnings> {
        let mut warnings = self.validate_create(new)?;
        if old.group_size() != new.group_size() {
            warnings.push(format!(
                "size changed from {} to {}; existing groups keep their gang size until they are recreated",
                old.group_size(),
                new.group_size()
            ));
        }
        Ok(warnings)
    }
}

fn check_budget(field: &str, value: IntOrPercent, errors: &mut Vec<String>) {
    if value.raw() < 0 {
        errors.push(format!("{field} must be greater than or equal to 0"));
    } else if value.is_percent() && value.raw() > 100 {
        errors.push(format!("{field} must not exceed 100%, got {value}"));
    }
}

/// [`Validator::validate_create`] under the default partition policy.
pub fn validate_create(set: &LeaderWorkerGroupSet) -> AdmissionResult<Warnings> {
    Validator::default().validate_create(set)
}
