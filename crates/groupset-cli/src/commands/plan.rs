use std::path::Path;

use anyhow::Context;
use groupset_core::revision_hash;
use groupset_rollout::{ObservedGroup, PlanInput, RolloutPhase, UpdatePlan, plan_updates};

use super::{load_config, load_set};

pub fn plan(
    config_path: &Path,
    file: &Path,
    observed: &Path,
    revision: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    let (revision, plan) = run(config_path, file, observed, revision)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        _ => {
            println!("Update revision: {revision}");
            println!(
                "Budget: max_unavailable={} max_surge={}",
                plan.budget.max_unavailable, plan.budget.max_surge
            );
            println!("Phase: {}", describe(&plan.phase()));
            println!("Eligible: {:?}", plan.eligible);
            println!("Update now: {:?}", plan.updates);
            if !plan.deferred.is_empty() {
                println!("Deferred: {:?}", plan.deferred);
            }
            if plan.burst_replicas > 0 {
                println!("Burst replicas: {}", plan.burst_replicas);
            }
        }
    }

    Ok(())
}

fn run(
    config_path: &Path,
    file: &Path,
    observed: &Path,
    revision: Option<&str>,
) -> anyhow::Result<(String, UpdatePlan)> {
    let config = load_config(config_path)?;
    let set = load_set(file, &config)?;
    let content = std::fs::read_to_string(observed)
        .with_context(|| format!("failed to read {}", observed.display()))?;
    let groups: Vec<ObservedGroup> = serde_json::from_str(&content)?;

    let revision = match revision {
        Some(revision) => revision.to_string(),
        None => revision_hash(&set.spec.leader_worker_template)?,
    };
    let plan = plan_updates(&PlanInput::from_set(&set, &revision, &groups))?;
    Ok((revision, plan))
}

fn describe(phase: &RolloutPhase) -> String {
    match phase {
        RolloutPhase::Paused => "paused (partition at or beyond replicas)".to_string(),
        RolloutPhase::Progressing { updated, eligible } => {
            format!("progressing ({updated}/{eligible} eligible groups updated)")
        }
        RolloutPhase::Completed => "completed".to_string(),
    }
}
