use std::path::Path;

use anyhow::Context;
use groupset_core::{ControllerConfig, UnitMeta};
use groupset_gang::{EnsureOutcome, GangProvider, SchedulerProvider};
use groupset_state::ConstraintGroupStore;
use tracing::info;

use super::{load_config, load_set, open_store};

pub async fn sync(config_path: &Path, file: &Path, units: &Path, format: &str) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let provider = GangProvider::new(open_store(&config)?);
    let report = run(&config, &provider, file, units).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report.units)?);
        }
        _ => {
            for (key, outcome) in &report.leaders {
                let label = match outcome {
                    EnsureOutcome::Existing => "unchanged",
                    EnsureOutcome::Created => "created",
                    EnsureOutcome::Converged => "created concurrently",
                };
                println!("✓ {key}: {label}");
            }
            println!("  {} units annotated", report.units.len());
        }
    }
    Ok(())
}

/// Annotated units and the constraint-group outcome of every leader.
#[derive(Debug)]
pub struct SyncReport {
    pub units: Vec<UnitMeta>,
    pub leaders: Vec<(String, EnsureOutcome)>,
}

async fn run<S>(
    config: &ControllerConfig,
    provider: &GangProvider<S>,
    file: &Path,
    units: &Path,
) -> anyhow::Result<SyncReport>
where
    S: ConstraintGroupStore + Clone + 'static,
{
    let set = load_set(file, config)?;
    let content = std::fs::read_to_string(units)
        .with_context(|| format!("failed to read {}", units.display()))?;
    let mut units: Vec<UnitMeta> = serde_json::from_str(&content)?;

    let mut leaders = Vec::new();
    for unit in &mut units {
        if unit.set_name()? != set.name {
            anyhow::bail!("unit {} does not belong to set {}", unit.name, set.name);
        }
        let key = provider.inject_group_metadata(unit)?;
        if unit.is_leader()? {
            let outcome = provider
                .ensure_constraint_group_within(&set, unit, config.reconcile.timeout())
                .await?;
            leaders.push((key, outcome));
        }
    }

    info!(set = %set.table_key(), units = units.len(), leaders = leaders.len(), "sync finished");
    Ok(SyncReport { units, leaders })
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupset_core::labels::GROUP_NAME_ANNOTATION;
    use groupset_state::{StateStore, TopologyMode};

    const MANIFEST: &str = r#"
name = "llama"
namespace = "default"

[spec]
replicas = 2

[spec.leader_worker_template]
size = 2

[spec.network_topology]
mode = "soft"
highest_tier_allowed = 1
"#;

    fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let file = dir.join("set.toml");
        let units = dir.join("units.json");
        std::fs::write(&file, MANIFEST).unwrap();
        let all = vec![
            UnitMeta::leader("llama", "default", 0, "rev1"),
            UnitMeta::worker("llama", "default", 0, 1, "rev1"),
            UnitMeta::leader("llama", "default", 1, "rev1"),
            UnitMeta::worker("llama", "default", 1, 1, "rev1"),
        ];
        std::fs::write(&units, serde_json::to_string(&all).unwrap()).unwrap();
        (file, units)
    }

    #[tokio::test]
    async fn creates_one_group_per_leader_and_annotates_every_unit() {
        let dir = tempfile::tempdir().unwrap();
        let (file, units) = write_inputs(dir.path());
        let provider = GangProvider::new(StateStore::open_in_memory().unwrap());
        let config = ControllerConfig::default();

        let report = run(&config, &provider, &file, &units).await.unwrap();
        assert_eq!(
            report.leaders,
            vec![
                ("llama-0-rev1".to_string(), EnsureOutcome::Created),
                ("llama-1-rev1".to_string(), EnsureOutcome::Created),
            ]
        );
        assert_eq!(report.units[1].annotations[GROUP_NAME_ANNOTATION], "llama-0-rev1");
        assert_eq!(report.units[3].annotations[GROUP_NAME_ANNOTATION], "llama-1-rev1");

        let stored = provider
            .store()
            .get_constraint_group("default", "llama-1-rev1")
            .unwrap()
            .unwrap();
        assert_eq!(stored.spec.min_member, 2);
        let topology = stored.spec.network_topology.unwrap();
        assert_eq!(topology.mode, TopologyMode::Soft);
        assert_eq!(topology.highest_tier_allowed, Some(1));

        let again = run(&config, &provider, &file, &units).await.unwrap();
        assert!(
            again
                .leaders
                .iter()
                .all(|(_, outcome)| *outcome == EnsureOutcome::Existing)
        );
    }

    #[tokio::test]
    async fn rejects_units_of_another_set() {
        let dir = tempfile::tempdir().unwrap();
        let (file, units) = write_inputs(dir.path());
        std::fs::write(
            &units,
            serde_json::to_string(&vec![UnitMeta::leader("other", "default", 0, "rev1")]).unwrap(),
        )
        .unwrap();
        let provider = GangProvider::new(StateStore::open_in_memory().unwrap());

        let err = run(&ControllerConfig::default(), &provider, &file, &units)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not belong"));
    }
}
