//! groupset.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// redb file holding constraint groups.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Deadline for one constraint-group sync (lookup + create), in milliseconds.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Namespace used when a manifest leaves it empty.
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("groupset.redb"),
        }
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
        }
    }
}

impl ReconcileConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ControllerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ControllerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a groupset.toml that keeps its store next to `data_dir`.
    pub fn scaffold(data_dir: &Path) -> Self {
        ControllerConfig {
            store: StoreConfig {
                path: data_dir.join("groupset.redb"),
            },
            ..Default::default()
        }
    }
}
