//! Rollout budgets and the partition policy.

use groupset_core::{IntOrPercent, Rounding};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// Surge and unavailable allowances resolved against the desired replica count.
///
/// Rounding follows the usual orchestration convention: `max_surge`
/// percentages round up and `max_unavailable` percentages round down. If
/// both resolve to zero the rollout could never make progress, so the
/// unavailable allowance is raised to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloutBudget {
    pub max_unavailable: u32,
    pub max_surge: u32,
}

impl RolloutBudget {
    pub fn resolve(
        replicas: i32,
        max_unavailable: IntOrPercent,
        max_surge: IntOrPercent,
    ) -> PlanResult<Self> {
        let unavailable = max_unavailable.scaled(replicas, Rounding::Down);
        let surge = max_surge.scaled(replicas, Rounding::Up);
        if unavailable < 0 {
            return Err(PlanError::NegativeBudget {
                field: "max_unavailable",
                value: unavailable,
            });
        }
        if surge < 0 {
            return Err(PlanError::NegativeBudget {
                field: "max_surge",
                value: surge,
            });
        }

        let mut budget = Self {
            max_unavailable: unavailable as u32,
            max_surge: surge as u32,
        };
        if budget.max_unavailable == 0 && budget.max_surge == 0 {
            budget.max_unavailable = 1;
        }
        Ok(budget)
    }
}

/// How a partition at or beyond the replica count is treated.
///
/// Earlier releases rejected `partition > replicas` at admission. The current
/// rule is [`PartitionPolicy::PauseBeyondReplicas`]: such a partition is
/// accepted and behaves exactly like `partition == replicas`, i.e. the
/// rollout is paused. Keeping the rule here means admission and planning
/// change together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PartitionPolicy {
    /// Accept and treat as a paused rollout.
    #[default]
    PauseBeyondReplicas,
    /// Reject partitions greater than replicas.
    RejectBeyondReplicas,
}

impl PartitionPolicy {
    /// Whether admission should accept `partition` for a set of `replicas` groups.
    ///
    /// Negative partitions are structural errors and are handled separately.
    pub fn accepts(&self, partition: i32, replicas: i32) -> bool {
        match self {
            PartitionPolicy::PauseBeyondReplicas => true,
            PartitionPolicy::RejectBeyondReplicas => partition <= replicas,
        }
    }
}

/// Lowest index allowed to advance, clamped to the replica count.
pub fn partition_boundary(partition: u32, replicas: u32) -> u32 {
    partition.min(replicas)
}
