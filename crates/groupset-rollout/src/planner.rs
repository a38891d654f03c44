//! Partition planner: decides which groups move to the update revision.
//!
//! Groups with index `>= partition` are eligible; lower indices stay pinned
//! to whatever revision they run. Eligible groups are visited from the
//! highest index down, so the updated region grows from the top and the
//! staged boundary only ever narrows toward the partition.
//!
//! The planner is pure: it reads the observed groups and returns a plan.
//! Creating, deleting, or recreating units is the caller's job.

use std::collections::BTreeMap;

use groupset_core::{IntOrPercent, LeaderWorkerGroupSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::budget::{RolloutBudget, partition_boundary};
use crate::error::{PlanError, PlanResult};

/// Observed state of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedGroup {
    pub index: u32,
    pub revision: String,
    /// Every unit of the group is up and serving.
    pub ready: bool,
}

/// Everything the planner looks at for one pass.
#[derive(Debug, Clone)]
pub struct PlanInput<'a> {
    pub desired_replicas: i32,
    pub group_size: i32,
    pub partition: i32,
    pub max_unavailable: IntOrPercent,
    pub max_surge: IntOrPercent,
    /// Revision every eligible group should converge to.
    pub update_revision: &'a str,
    pub groups: &'a [ObservedGroup],
}

impl<'a> PlanInput<'a> {
    pub fn from_set(
        set: &LeaderWorkerGroupSet,
        update_revision: &'a str,
        groups: &'a [ObservedGroup],
    ) -> Self {
        let rolling = set.rolling_update();
        Self {
            desired_replicas: set.replicas(),
            group_size: set.group_size(),
            partition: set.partition(),
            max_unavailable: rolling.max_unavailable,
            max_surge: rolling.max_surge,
            update_revision,
            groups,
        }
    }
}

/// Outcome of one planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub budget: RolloutBudget,
    /// Indices allowed to advance, highest first.
    pub eligible: Vec<u32>,
    /// Stale eligible groups to recreate this pass, highest first.
    ///
    /// Stale groups that are already out of service are always included;
    /// replacing them takes nothing further down.
    pub updates: Vec<u32>,
    /// Stale eligible groups left for later passes.
    pub deferred: Vec<u32>,
    /// Eligible groups observed on the update revision.
    pub updated: u32,
    /// Extra groups (indices `replicas..replicas + burst`) allowed to exist now.
    pub burst_replicas: u32,
    /// Unavailable budget in use once `updates` are applied.
    pub unavailable_consumed: u32,
    /// Groups below the partition still on another revision.
    pub pinned_stale: u32,
    /// The partition is at or beyond the replica count.
    pub paused: bool,
}

/// Progress of a rollout as seen by one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloutPhase {
    /// Partition at or beyond replicas while some group is still stale.
    Paused,
    /// `updated` of `eligible` groups run the update revision.
    Progressing { updated: u32, eligible: u32 },
    /// Every eligible group runs the update revision.
    Completed,
}

impl UpdatePlan {
    pub fn phase(&self) -> RolloutPhase {
        if self.paused && self.pinned_stale > 0 {
            return RolloutPhase::Paused;
        }
        let eligible = self.eligible.len() as u32;
        if self.updated == eligible {
            return RolloutPhase::Completed;
        }
        RolloutPhase::Progressing {
            updated: self.updated,
            eligible,
        }
    }
}

/// Compute which groups to update this pass.
pub fn plan_updates(input: &PlanInput<'_>) -> PlanResult<UpdatePlan> {
    if input.desired_replicas < 0 {
        return Err(PlanError::NegativeReplicas(input.desired_replicas));
    }
    if input.group_size < 1 {
        return Err(PlanError::InvalidGroupSize(input.group_size));
    }
    if input.partition < 0 {
        return Err(PlanError::NegativePartition(input.partition));
    }

    let budget = RolloutBudget::resolve(
        input.desired_replicas,
        input.max_unavailable,
        input.max_surge,
    )?;
    let replicas = input.desired_replicas as u32;
    let boundary = partition_boundary(input.partition as u32, replicas);
    let paused = boundary == replicas;

    let by_index: BTreeMap<u32, &ObservedGroup> =
        input.groups.iter().map(|g| (g.index, g)).collect();

    let eligible: Vec<u32> = (boundary..replicas).rev().collect();
    // Missing groups are created at the update revision, so only existing
    // groups on another revision count as stale.
    let stale: Vec<u32> = eligible
        .iter()
        .copied()
        .filter(|index| {
            by_index
                .get(index)
                .is_some_and(|g| g.revision != input.update_revision)
        })
        .collect();

    let burst_replicas = budget.max_surge.min(stale.len() as u32);

    let ready = by_index
        .values()
        .filter(|g| g.index < replicas + burst_replicas && g.ready)
        .count() as u32;
    let min_available = replicas.saturating_sub(budget.max_unavailable);
    let mut can_take_down = ready.saturating_sub(min_available);

    let mut updates = Vec::new();
    let mut deferred = Vec::new();
    for index in stale.iter().copied() {
        let is_ready = by_index.get(&index).is_some_and(|g| g.ready);
        if !is_ready {
            updates.push(index);
        } else if can_take_down > 0 {
            can_take_down -= 1;
            updates.push(index);
        } else {
            deferred.push(index);
        }
    }
    let updated = eligible
        .iter()
        .filter(|&&index| {
            by_index
                .get(&index)
                .is_some_and(|g| g.revision == input.update_revision)
        })
        .count() as u32;

    let ready_in_desired = by_index
        .values()
        .filter(|g| g.index < replicas && g.ready)
        .count() as u32;
    let taken_down = updates
        .iter()
        .filter(|index| by_index.get(index).is_some_and(|g| g.ready))
        .count() as u32;
    let unavailable_consumed = (replicas - ready_in_desired) + taken_down;
    let pinned_stale = by_index
        .values()
        .filter(|g| g.index < boundary && g.revision != input.update_revision)
        .count() as u32;

    if paused && pinned_stale > 0 {
        info!(partition = input.partition, replicas, "rollout paused by partition");
    }
    debug!(
        replicas,
        boundary,
        eligible = eligible.len(),
        stale = stale.len(),
        updates = ?updates,
        burst_replicas,
        "planned rolling update"
    );

    Ok(UpdatePlan {
        budget,
        eligible,
        updates,
        deferred,
        updated,
        burst_replicas,
        unavailable_consumed,
        pinned_stale,
        paused,
    })
}
