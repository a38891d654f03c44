//! Set-level network topology to constraint-group topology.

use groupset_core::NetworkTopology;
use groupset_state::{TopologyMode, TopologySpec};

/// Map a submitted mode string. Only `"soft"` is soft; empty and
/// unrecognized values default to hard.
pub fn map_mode(mode: &str) -> TopologyMode {
    match mode {
        "soft" => TopologyMode::Soft,
        _ => TopologyMode::Hard,
    }
}

/// Topology for a new constraint group; absent iff the set has none.
pub fn derive_topology(policy: Option<&NetworkTopology>) -> Option<TopologySpec> {
    policy.map(|topology| TopologySpec {
        mode: map_mode(&topology.mode),
        highest_tier_allowed: Some(topology.highest_tier_allowed),
    })
}
