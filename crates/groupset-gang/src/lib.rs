//! groupset-gang: gang-scheduling constraint groups.
//!
//! Publishes one immutable constraint group per (group, revision) for the
//! external gang scheduler. The constraint group says how many units must
//! be admitted together (`min_member`) and, when the set asks for it, how
//! tightly they must be packed in the network topology.
//!
//! # Architecture
//!
//! ```text
//! GangProvider<S: ConstraintGroupStore>
//!   ├── ensure_constraint_group        lookup → create if absent
//!   ├── ensure_constraint_group_within same, on the blocking pool under a deadline
//!   └── inject_group_metadata          group-key annotation on units
//! ```

pub mod error;
pub mod provider;
pub mod topology;

pub use error::{GangError, GangResult};
pub use provider::{EnsureOutcome, GangProvider, SchedulerProvider, build_constraint_group};
pub use topology::{derive_topology, map_mode};
