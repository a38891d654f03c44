//! End-to-end constraint-group scenarios against the redb store.
//!
//! Each case builds a set and a labelled, annotated leader, runs the
//! provider, and reads the stored constraint group back.

use groupset_core::labels::{GROUP_INDEX_LABEL, GROUP_NAME_ANNOTATION, SET_NAME_LABEL};
use groupset_core::*;
use groupset_gang::{EnsureOutcome, GangProvider};
use groupset_state::*;

fn test_set(name: &str, replicas: i32, size: i32, topology: Option<(&str, i32)>) -> LeaderWorkerGroupSet {
    LeaderWorkerGroupSet {
        name: name.to_string(),
        namespace: "default".to_string(),
        spec: GroupSetSpec {
            replicas,
            leader_worker_template: LeaderWorkerTemplate {
                size,
                leader_template: None,
                worker_template: serde_json::json!({"image": "server:v1"}),
            },
            rollout_strategy: RolloutStrategy::default(),
            network_topology: topology.map(|(mode, tier)| NetworkTopology {
                mode: mode.to_string(),
                highest_tier_allowed: tier,
            }),
        },
    }
}

fn leader_pod(set: &str, revision: &str) -> UnitMeta {
    let mut leader = UnitMeta::leader(set, "default", 0, revision);
    leader.annotations.insert(
        GROUP_NAME_ANNOTATION.to_string(),
        format!("{set}-0-{revision}"),
    );
    leader
}

struct Case {
    name: &'static str,
    set: LeaderWorkerGroupSet,
    leader: UnitMeta,
    expected: Option<TopologySpec>,
}

#[test]
fn creates_constraint_group_with_network_topology() {
    let cases = vec![
        Case {
            name: "hard mode with tier 2",
            set: test_set("test-lws-hard", 2, 4, Some(("hard", 2))),
            leader: leader_pod("test-lws-hard", "rev1"),
            expected: Some(TopologySpec {
                mode: TopologyMode::Hard,
                highest_tier_allowed: Some(2),
            }),
        },
        Case {
            name: "soft mode with tier 1",
            set: test_set("test-lws-soft", 1, 8, Some(("soft", 1))),
            leader: leader_pod("test-lws-soft", "rev2"),
            expected: Some(TopologySpec {
                mode: TopologyMode::Soft,
                highest_tier_allowed: Some(1),
            }),
        },
        Case {
            name: "no network topology",
            set: test_set("test-lws-no-topology", 1, 2, None),
            leader: leader_pod("test-lws-no-topology", "rev3"),
            expected: None,
        },
        Case {
            name: "empty mode defaults to hard",
            set: test_set("test-lws-default", 1, 3, Some(("", 3))),
            leader: leader_pod("test-lws-default", "rev4"),
            expected: Some(TopologySpec {
                mode: TopologyMode::Hard,
                highest_tier_allowed: Some(3),
            }),
        },
    ];

    for case in cases {
        let store = StateStore::open_in_memory().unwrap();
        let provider = GangProvider::new(store.clone());

        let outcome = provider
            .ensure_constraint_group(&case.set, &case.leader)
            .unwrap_or_else(|e| panic!("{}: {e}", case.name));
        assert_eq!(outcome, EnsureOutcome::Created, "{}", case.name);

        let key = &case.leader.annotations[GROUP_NAME_ANNOTATION];
        let group = store
            .get_constraint_group(&case.set.namespace, key)
            .unwrap()
            .unwrap_or_else(|| panic!("{}: constraint group missing", case.name));

        assert_eq!(group.spec.network_topology, case.expected, "{}", case.name);
        assert_eq!(group.labels[SET_NAME_LABEL], case.set.name, "{}", case.name);
        assert_eq!(
            group.labels[GROUP_INDEX_LABEL], case.leader.labels[GROUP_INDEX_LABEL],
            "{}",
            case.name
        );
        assert_eq!(group.spec.min_member, case.set.group_size(), "{}", case.name);
    }
}

#[test]
fn existing_constraint_group_is_left_unchanged() {
    let store = StateStore::open_in_memory().unwrap();
    store
        .create_constraint_group(&ConstraintGroup {
            name: "test-lws-0-rev1".to_string(),
            namespace: "default".to_string(),
            labels: Default::default(),
            spec: ConstraintGroupSpec {
                min_member: 4,
                network_topology: None,
            },
        })
        .unwrap();

    let provider = GangProvider::new(store.clone());
    let set = test_set("test-lws", 1, 4, Some(("hard", 2)));
    let outcome = provider
        .ensure_constraint_group(&set, &leader_pod("test-lws", "rev1"))
        .unwrap();
    assert_eq!(outcome, EnsureOutcome::Existing);

    let group = store
        .get_constraint_group("default", "test-lws-0-rev1")
        .unwrap()
        .unwrap();
    assert!(group.spec.network_topology.is_none());
    assert_eq!(group.spec.min_member, 4);
}

#[test]
fn every_group_of_a_set_gets_its_own_constraint_group() {
    let store = StateStore::open_in_memory().unwrap();
    let provider = GangProvider::new(store.clone());
    let set = test_set("llama", 3, 2, None);
    let revision = revision_hash(&set.spec.leader_worker_template).unwrap();

    for index in 0..3 {
        let leader = UnitMeta::leader("llama", "default", index, &revision);
        provider.ensure_constraint_group(&set, &leader).unwrap();
        provider.ensure_constraint_group(&set, &leader).unwrap();
    }

    let groups = store.list_constraint_groups(Some("default")).unwrap();
    assert_eq!(groups.len(), 3);
    assert!(groups.iter().all(|g| g.name.ends_with(&revision)));
}
