//! groupset-rollout: partition-bounded rolling updates.
//!
//! Decides, for one reconciliation pass, which groups of a set may be
//! recreated at the update revision. The decision respects the partition
//! (indices below it are pinned), the unavailable budget, and the surge
//! budget, and always walks eligible groups from the highest index down.
//!
//! # Components
//!
//! - **`budget`**: surge/unavailable resolution and the partition policy
//! - **`planner`**: `plan_updates` and rollout phase reporting

pub mod budget;
pub mod error;
pub mod planner;

pub use budget::{PartitionPolicy, RolloutBudget, partition_boundary};
pub use error::{PlanError, PlanResult};
pub use planner::{ObservedGroup, PlanInput, RolloutPhase, UpdatePlan, plan_updates};
