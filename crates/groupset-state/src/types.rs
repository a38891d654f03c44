//! Constraint-group types published to the gang scheduler.
//!
//! One `ConstraintGroup` exists per (group, revision). It tells the gang
//! scheduler how many units must be admitted together and, optionally, how
//! far apart in the network topology they may land.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scheduling-constraint object for one group at one revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstraintGroup {
    /// Group key: `{set}-{index}-{revision}`.
    pub name: String,
    pub namespace: String,
    /// Set-name and group-index labels copied from the group.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub spec: ConstraintGroupSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstraintGroupSpec {
    /// Units that must be schedulable together; the group size at creation.
    pub min_member: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_topology: Option<TopologySpec>,
}

/// Materialized topology constraint. The mode is never empty here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopologySpec {
    pub mode: TopologyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_tier_allowed: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyMode {
    Hard,
    Soft,
}

impl TopologyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyMode::Hard => "hard",
            TopologyMode::Soft => "soft",
        }
    }
}

impl ConstraintGroup {
    /// Build the composite key for the constraint-groups table.
    pub fn table_key(&self) -> String {
        table_key(&self.namespace, &self.name)
    }
}

pub(crate) fn table_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}
