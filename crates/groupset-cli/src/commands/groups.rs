use std::path::Path;

use groupset_state::{ConstraintGroup, StateStore};

use super::{load_config, open_store};

pub fn groups(config_path: &Path, namespace: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let groups = list(&store, namespace)?;

    if groups.is_empty() {
        println!("No constraint groups stored.");
        return Ok(());
    }
    println!("{:<16} {:<40} {:>10}  TOPOLOGY", "NAMESPACE", "NAME", "MIN_MEMBER");
    for group in groups {
        let topology = match &group.spec.network_topology {
            Some(t) => match t.highest_tier_allowed {
                Some(tier) => format!("{} (tier {tier})", t.mode.as_str()),
                None => t.mode.as_str().to_string(),
            },
            None => "-".to_string(),
        };
        println!(
            "{:<16} {:<40} {:>10}  {topology}",
            group.namespace, group.name, group.spec.min_member
        );
    }
    Ok(())
}

fn list(store: &StateStore, namespace: Option<&str>) -> anyhow::Result<Vec<ConstraintGroup>> {
    let mut groups = store.list_constraint_groups(namespace)?;
    groups.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use groupset_state::{ConstraintGroupSpec, ConstraintGroupStore};

    fn group(namespace: &str, name: &str) -> ConstraintGroup {
        ConstraintGroup {
            name: name.to_string(),
            namespace: namespace.to_string(),
            labels: BTreeMap::new(),
            spec: ConstraintGroupSpec {
                min_member: 2,
                network_topology: None,
            },
        }
    }

    #[test]
    fn lists_sorted_and_filtered() {
        let store = StateStore::open_in_memory().unwrap();
        store.create_constraint_group(&group("b", "x-0-r")).unwrap();
        store.create_constraint_group(&group("a", "y-1-r")).unwrap();
        store.create_constraint_group(&group("a", "y-0-r")).unwrap();

        let names: Vec<_> = list(&store, None)
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, ["y-0-r", "y-1-r", "x-0-r"]);
        assert_eq!(list(&store, Some("b")).unwrap().len(), 1);
    }
}
