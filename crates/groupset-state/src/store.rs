//! StateStore: redb-backed persistence for constraint groups.
//!
//! Constraint groups are write-once: the only mutation is an
//! insert-if-absent create, performed inside a single write transaction so
//! racing creators serialize and exactly one of them wins. There is no
//! update path. The store supports on-disk and in-memory backends (the
//! latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Minimal capability the gang synchronizer needs from a constraint-group store.
///
/// `create_constraint_group` must be all-or-nothing and must fail with
/// [`StateError::AlreadyExists`] when the key is taken; it never replaces an
/// existing object.
pub trait ConstraintGroupStore: Send + Sync {
    fn get_constraint_group(
        &self,
        namespace: &str,
        name: &str,
    ) -> StateResult<Option<ConstraintGroup>>;

    fn create_constraint_group(&self, group: &ConstraintGroup) -> StateResult<()>;
}

impl<S: ConstraintGroupStore + ?Sized> ConstraintGroupStore for Arc<S> {
    fn get_constraint_group(
        &self,
        namespace: &str,
        name: &str,
    ) -> StateResult<Option<ConstraintGroup>> {
        (**self).get_constraint_group(namespace, name)
    }

    fn create_constraint_group(&self, group: &ConstraintGroup) -> StateResult<()> {
        (**self).create_constraint_group(group)
    }
}

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(CONSTRAINT_GROUPS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// List constraint groups, optionally restricted to one namespace.
    pub fn list_constraint_groups(
        &self,
        namespace: Option<&str>,
    ) -> StateResult<Vec<ConstraintGroup>> {
        let prefix = namespace.map(|ns| format!("{ns}/"));
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CONSTRAINT_GROUPS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if let Some(prefix) = &prefix {
                if !key.value().starts_with(prefix.as_str()) {
                    continue;
                }
            }
            let group: ConstraintGroup =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(group);
        }
        Ok(results)
    }
}

impl ConstraintGroupStore for StateStore {
    fn get_constraint_group(
        &self,
        namespace: &str,
        name: &str,
    ) -> StateResult<Option<ConstraintGroup>> {
        let key = table_key(namespace, name);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(CONSTRAINT_GROUPS).map_err(map_err!(Table))?;
        match table.get(key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let group: ConstraintGroup =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(group))
            }
            None => Ok(None),
        }
    }

    fn create_constraint_group(&self, group: &ConstraintGroup) -> StateResult<()> {
        let key = group.table_key();
        let value = serde_json::to_vec(group).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(CONSTRAINT_GROUPS).map_err(map_err!(Table))?;
            let taken = table.get(key.as_str()).map_err(map_err!(Read))?.is_some();
            if taken {
                // Dropping the uncommitted transaction discards it.
                return Err(StateError::AlreadyExists(key));
            }
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, min_member = group.spec.min_member, "constraint group stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::thread;

    fn test_group(namespace: &str, name: &str, min_member: i32) -> ConstraintGroup {
        ConstraintGroup {
            name: name.to_string(),
            namespace: namespace.to_string(),
            labels: BTreeMap::from([
                ("groupset.io/name".to_string(), "llama".to_string()),
                ("groupset.io/group-index".to_string(), "0".to_string()),
            ]),
            spec: ConstraintGroupSpec {
                min_member,
                network_topology: Some(TopologySpec {
                    mode: TopologyMode::Hard,
                    highest_tier_allowed: Some(2),
                }),
            },
        }
    }

    #[test]
    fn create_and_get() {
        let store = StateStore::open_in_memory().unwrap();
        let group = test_group("default", "llama-0-rev1", 4);

        store.create_constraint_group(&group).unwrap();
        let retrieved = store
            .get_constraint_group("default", "llama-0-rev1")
            .unwrap();

        assert_eq!(retrieved, Some(group));
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let store = StateStore::open_in_memory().unwrap();
        assert!(store.get_constraint_group("default", "nope").unwrap().is_none());
    }

    #[test]
    fn namespaces_are_separate_keys() {
        let store = StateStore::open_in_memory().unwrap();
        store
            .create_constraint_group(&test_group("a", "llama-0-rev1", 4))
            .unwrap();
        assert!(store.get_constraint_group("b", "llama-0-rev1").unwrap().is_none());
        store
            .create_constraint_group(&test_group("b", "llama-0-rev1", 4))
            .unwrap();
    }

    #[test]
    fn second_create_is_rejected_and_does_not_overwrite() {
        let store = StateStore::open_in_memory().unwrap();
        store
            .create_constraint_group(&test_group("default", "llama-0-rev1", 4))
            .unwrap();

        let err = store
            .create_constraint_group(&test_group("default", "llama-0-rev1", 8))
            .unwrap_err();
        assert!(err.is_already_exists());

        let stored = store
            .get_constraint_group("default", "llama-0-rev1")
            .unwrap()
            .unwrap();
        assert_eq!(stored.spec.min_member, 4);
    }

    #[test]
    fn racing_creates_yield_one_winner() {
        let store = StateStore::open_in_memory().unwrap();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    store.create_constraint_group(&test_group("default", "llama-0-rev1", 4 + i))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_already_exists()))
            .count();

        assert_eq!(winners, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(store.list_constraint_groups(None).unwrap().len(), 1);
    }

    #[test]
    fn list_filters_by_namespace() {
        let store = StateStore::open_in_memory().unwrap();
        store
            .create_constraint_group(&test_group("ns1", "a-0-r", 2))
            .unwrap();
        store
            .create_constraint_group(&test_group("ns1", "a-1-r", 2))
            .unwrap();
        store
            .create_constraint_group(&test_group("ns2", "b-0-r", 2))
            .unwrap();

        assert_eq!(store.list_constraint_groups(None).unwrap().len(), 3);
        assert_eq!(store.list_constraint_groups(Some("ns1")).unwrap().len(), 2);
        assert!(store.list_constraint_groups(Some("ns3")).unwrap().is_empty());
    }

    #[test]
    fn shared_through_arc() {
        let store: Arc<dyn ConstraintGroupStore> = Arc::new(StateStore::open_in_memory().unwrap());
        store
            .create_constraint_group(&test_group("default", "x-0-r", 3))
            .unwrap();
        assert!(store.get_constraint_group("default", "x-0-r").unwrap().is_some());
    }

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.redb");

        {
            let store = StateStore::open(&db_path).unwrap();
            store
                .create_constraint_group(&test_group("prod", "llama-3-abc", 16))
                .unwrap();
        }

        let store = StateStore::open(&db_path).unwrap();
        let group = store.get_constraint_group("prod", "llama-3-abc").unwrap();
        assert_eq!(group.unwrap().spec.min_member, 16);
    }

    #[test]
    fn topology_absent_is_omitted_from_json() {
        let mut group = test_group("default", "a-0-r", 2);
        group.spec.network_topology = None;
        let json = serde_json::to_string(&group).unwrap();
        assert!(!json.contains("network_topology"));
        let back: ConstraintGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, group);
    }
}
