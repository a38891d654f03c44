pub mod groups;
pub mod init;
pub mod plan;
pub mod sync;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use groupset_core::{ControllerConfig, LeaderWorkerGroupSet};
use groupset_state::StateStore;
use tracing::debug;

/// Load the controller config, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> anyhow::Result<ControllerConfig> {
    if !path.exists() {
        debug!(?path, "no config file, using defaults");
        return Ok(ControllerConfig::default());
    }
    ControllerConfig::from_file(path)
        .with_context(|| format!("failed to read config {}", path.display()))
}

/// Load a set manifest; an empty namespace takes the configured default.
pub fn load_set(path: &Path, config: &ControllerConfig) -> anyhow::Result<LeaderWorkerGroupSet> {
    let mut set = LeaderWorkerGroupSet::from_file(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;
    if set.namespace.is_empty() {
        set.namespace = config.defaults.namespace.clone();
    }
    Ok(set)
}

pub fn open_store(config: &ControllerConfig) -> anyhow::Result<StateStore> {
    StateStore::open(&config.store.path)
        .with_context(|| format!("failed to open store {}", config.store.path.display()))
}
