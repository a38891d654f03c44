//! Gang provider: keeps one constraint group per (group, revision).
//!
//! For every group leader the reconcile loop observes, the provider makes
//! sure a constraint group exists under the leader's group key. Existing
//! constraint groups are never touched: their `min_member` was declared
//! against the group size in effect when the group's units were created, and
//! changing it underneath a running gang would split the gang's accounting.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use groupset_core::labels::{GROUP_INDEX_LABEL, GROUP_NAME_ANNOTATION, SET_NAME_LABEL};
use groupset_core::{LeaderWorkerGroupSet, UnitMeta};
use groupset_state::{ConstraintGroup, ConstraintGroupSpec, ConstraintGroupStore};
use tracing::{debug, info};

use crate::error::{GangError, GangResult};
use crate::topology::derive_topology;

/// Result of a successful sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// A constraint group was already stored; nothing was written.
    Existing,
    /// This call created the constraint group.
    Created,
    /// Another writer created it between our lookup and our create.
    Converged,
}

/// Plug point for gang schedulers.
pub trait SchedulerProvider: Send + Sync {
    /// Ensure the constraint group for `leader`'s group exists.
    fn create_group_if_not_exists(
        &self,
        set: &LeaderWorkerGroupSet,
        leader: &UnitMeta,
    ) -> GangResult<EnsureOutcome>;

    /// Stamp the group-key annotation on a unit so the scheduler can find
    /// its constraint group. Returns the key.
    fn inject_group_metadata(&self, unit: &mut UnitMeta) -> GangResult<String>;
}

/// Constraint-group provider over any [`ConstraintGroupStore`].
#[derive(Clone)]
pub struct GangProvider<S> {
    store: S,
}

impl<S: ConstraintGroupStore> GangProvider<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up the leader's constraint group and create it if absent.
    ///
    /// Performs one lookup, plus exactly one create when nothing is stored.
    /// A create that loses a race reports [`EnsureOutcome::Converged`].
    pub fn ensure_constraint_group(
        &self,
        set: &LeaderWorkerGroupSet,
        leader: &UnitMeta,
    ) -> GangResult<EnsureOutcome> {
        self.ensure_unless_abandoned(set, leader, &AtomicBool::new(false))
    }

    /// Same as `ensure_constraint_group`, but skips the create once
    /// `abandoned` is set.
    fn ensure_unless_abandoned(
        &self,
        set: &LeaderWorkerGroupSet,
        leader: &UnitMeta,
        abandoned: &AtomicBool,
    ) -> GangResult<EnsureOutcome> {
        let key = leader.group_key()?;

        if self
            .store
            .get_constraint_group(&set.namespace, &key)?
            .is_some()
        {
            debug!(%key, namespace = %set.namespace, "constraint group exists");
            return Ok(EnsureOutcome::Existing);
        }

        let group = build_constraint_group(set, leader, key)?;
        if abandoned.load(Ordering::SeqCst) {
            debug!(key = %group.name, "caller gave up before create");
            return Err(GangError::Abandoned);
        }
        match self.store.create_constraint_group(&group) {
            Ok(()) => {
                info!(
                    key = %group.name,
                    namespace = %group.namespace,
                    min_member = group.spec.min_member,
                    topology = ?group.spec.network_topology.as_ref().map(|t| t.mode.as_str()),
                    "constraint group created"
                );
                Ok(EnsureOutcome::Created)
            }
            Err(e) if e.is_already_exists() => {
                debug!(key = %group.name, "constraint group created concurrently");
                Ok(EnsureOutcome::Converged)
            }
            Err(e) => Err(GangError::Store(e)),
        }
    }
}

impl<S: ConstraintGroupStore + Clone + 'static> GangProvider<S> {
    /// [`ensure_constraint_group`](Self::ensure_constraint_group) bounded by
    /// `deadline`.
    ///
    /// Store calls block, so they run on the blocking pool. On expiry the
    /// caller gets [`GangError::DeadlineExceeded`] and the task is told to
    /// skip its create. A create already in flight at that point commits or
    /// aborts as a whole, never partially.
    pub async fn ensure_constraint_group_within(
        &self,
        set: &LeaderWorkerGroupSet,
        leader: &UnitMeta,
        deadline: Duration,
    ) -> GangResult<EnsureOutcome> {
        let provider = self.clone();
        let set = set.clone();
        let leader = leader.clone();
        let abandoned = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&abandoned);
        let task = tokio::task::spawn_blocking(move || {
            provider.ensure_unless_abandoned(&set, &leader, &flag)
        });

        match tokio::time::timeout(deadline, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(GangError::Join(join.to_string())),
            Err(_) => {
                abandoned.store(true, Ordering::SeqCst);
                Err(GangError::DeadlineExceeded(deadline))
            }
        }
    }
}

impl<S: ConstraintGroupStore> SchedulerProvider for GangProvider<S> {
    fn create_group_if_not_exists(
        &self,
        set: &LeaderWorkerGroupSet,
        leader: &UnitMeta,
    ) -> GangResult<EnsureOutcome> {
        self.ensure_constraint_group(set, leader)
    }

    fn inject_group_metadata(&self, unit: &mut UnitMeta) -> GangResult<String> {
        if let Some(key) = unit.annotations.get(GROUP_NAME_ANNOTATION) {
            return Ok(key.clone());
        }
        let key = unit.derived_group_key()?;
        unit.annotations
            .insert(GROUP_NAME_ANNOTATION.to_string(), key.clone());
        Ok(key)
    }
}

/// The constraint group a new (group, revision) should get.
pub fn build_constraint_group(
    set: &LeaderWorkerGroupSet,
    leader: &UnitMeta,
    key: String,
) -> GangResult<ConstraintGroup> {
    let labels = BTreeMap::from([
        (SET_NAME_LABEL.to_string(), set.name.clone()),
        (GROUP_INDEX_LABEL.to_string(), leader.group_index()?.to_string()),
    ]);
    Ok(ConstraintGroup {
        name: key,
        namespace: set.namespace.clone(),
        labels,
        spec: ConstraintGroupSpec {
            min_member: set.group_size(),
            network_topology: derive_topology(set.spec.network_topology.as_ref()),
        },
    })
}
