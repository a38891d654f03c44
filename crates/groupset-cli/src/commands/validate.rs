use std::path::Path;

use groupset_admission::{Validator, Warnings};
use groupset_rollout::PartitionPolicy;

use super::{load_config, load_set};

pub fn validate(
    config_path: &Path,
    file: &Path,
    previous: Option<&Path>,
    strict_partition: bool,
) -> anyhow::Result<()> {
    match run(config_path, file, previous, strict_partition) {
        Ok(warnings) => {
            println!("✓ {} admitted", file.display());
            for warning in warnings {
                println!("  warning: {warning}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Validation failed: {e}");
            Err(e)
        }
    }
}

fn run(
    config_path: &Path,
    file: &Path,
    previous: Option<&Path>,
    strict_partition: bool,
) -> anyhow::Result<Warnings> {
    let config = load_config(config_path)?;
    let set = load_set(file, &config)?;
    let policy = if strict_partition {
        PartitionPolicy::RejectBeyondReplicas
    } else {
        PartitionPolicy::PauseBeyondReplicas
    };
    let validator = Validator::new(policy);

    let warnings = match previous {
        Some(previous) => {
            let old = load_set(previous, &config)?;
            validator.validate_update(&old, &set)?
        }
        None => validator.validate_create(&set)?,
    };
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(replicas: i32, size: i32, partition: i32) -> String {
        format!(
            r#"
name = "llama"
namespace = "default"

[spec]
replicas = {replicas}

[spec.leader_worker_template]
size = {size}

[spec.rollout_strategy.rolling_update]
partition = {partition}
max_surge = "25%"
"#
        )
    }

    #[test]
    fn admits_and_warns() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("groupset.toml");
        let file = dir.path().join("set.toml");

        std::fs::write(&file, manifest(6, 4, 3)).unwrap();
        assert!(run(&config, &file, None, false).unwrap().is_empty());

        std::fs::write(&file, manifest(6, 4, 9)).unwrap();
        assert_eq!(run(&config, &file, None, false).unwrap().len(), 1);
        assert!(run(&config, &file, None, true).is_err());
    }

    #[test]
    fn rejects_negative_partition() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("set.toml");
        std::fs::write(&file, manifest(6, 4, -1)).unwrap();

        let err = run(&dir.path().join("groupset.toml"), &file, None, false).unwrap_err();
        assert!(err.to_string().contains("partition must be greater than or equal to 0"));
    }

    #[test]
    fn update_reports_size_change() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.toml");
        let new = dir.path().join("new.toml");
        std::fs::write(&old, manifest(2, 4, 0)).unwrap();
        std::fs::write(&new, manifest(2, 8, 0)).unwrap();

        let warnings = run(&dir.path().join("groupset.toml"), &new, Some(&old), false).unwrap();
        assert_eq!(warnings.len(), 1);
    }
}
