//! Desired-state types for leader-worker group sets.
//!
//! A [`LeaderWorkerGroupSet`] describes `replicas` groups, each made of one
//! leader unit and `size - 1` worker units. Integer fields are signed so that
//! invalid submissions survive parsing and can be rejected by admission.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::intstr::IntOrPercent;

/// Top-level desired-state object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderWorkerGroupSet {
    pub name: String,
    /// Empty when the manifest leaves it out; tooling fills in a default.
    #[serde(default)]
    pub namespace: String,
    pub spec: GroupSetSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSetSpec {
    /// Desired number of groups.
    #[serde(default = "default_replicas")]
    pub replicas: i32,
    pub leader_worker_template: LeaderWorkerTemplate,
    #[serde(default)]
    pub rollout_strategy: RolloutStrategy,
    /// Locality constraint forwarded to the gang scheduler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_topology: Option<NetworkTopology>,
}

/// Templates for the leader and worker units of every group.
///
/// The template bodies are opaque to this crate; they only feed the
/// revision hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderWorkerTemplate {
    /// Units per group, leader included.
    #[serde(default = "default_size")]
    pub size: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_template: Option<serde_json::Value>,
    #[serde(default)]
    pub worker_template: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RolloutStrategyType {
    #[default]
    RollingUpdate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RolloutStrategy {
    #[serde(default, rename = "type")]
    pub kind: RolloutStrategyType,
    #[serde(default)]
    pub rolling_update: RollingUpdateConfig,
}

/// Parameters of a partitioned rolling update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingUpdateConfig {
    /// Lowest group index allowed to move to the new revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<i32>,
    #[serde(default = "default_max_unavailable")]
    pub max_unavailable: IntOrPercent,
    #[serde(default = "default_max_surge")]
    pub max_surge: IntOrPercent,
}

impl Default for RollingUpdateConfig {
    fn default() -> Self {
        Self {
            partition: None,
            max_unavailable: default_max_unavailable(),
            max_surge: default_max_surge(),
        }
    }
}

/// Set-level network topology policy.
///
/// `mode` is kept as the raw submitted string: `"soft"`, `"hard"`, or empty.
/// Unrecognized values are tolerated here and mapped when the constraint
/// group is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTopology {
    #[serde(default)]
    pub mode: String,
    pub highest_tier_allowed: i32,
}

fn default_replicas() -> i32 {
    1
}

fn default_size() -> i32 {
    1
}

fn default_max_unavailable() -> IntOrPercent {
    IntOrPercent::Count(1)
}

fn default_max_surge() -> IntOrPercent {
    IntOrPercent::Count(0)
}

impl LeaderWorkerGroupSet {
    /// Load a manifest. `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Ok(toml::from_str(&content)?),
        }
    }

    /// Build the composite `{namespace}/{name}` key.
    pub fn table_key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    pub fn replicas(&self) -> i32 {
        self.spec.replicas
    }

    pub fn group_size(&self) -> i32 {
        self.spec.leader_worker_template.size
    }

    /// Effective partition; an unset partition means every group may update.
    pub fn partition(&self) -> i32 {
        self.spec.rollout_strategy.rolling_update.partition.unwrap_or(0)
    }

    pub fn rolling_update(&self) -> &RollingUpdateConfig {
        &self.spec.rollout_strategy.rolling_update
    }
}
