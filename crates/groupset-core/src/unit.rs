//! Observed identity of a workload unit (leader or worker).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::labels::{
    GROUP_INDEX_LABEL, GROUP_NAME_ANNOTATION, REVISION_LABEL, SET_NAME_LABEL, group_key,
};

/// Name, namespace, labels, and annotations of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl UnitMeta {
    /// Leader unit of group `index`, labelled the way the group controller labels it.
    pub fn leader(set_name: &str, namespace: &str, index: u32, revision: &str) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(SET_NAME_LABEL.to_string(), set_name.to_string());
        labels.insert(GROUP_INDEX_LABEL.to_string(), index.to_string());
        labels.insert(REVISION_LABEL.to_string(), revision.to_string());
        Self {
            name: format!("{set_name}-{index}"),
            namespace: namespace.to_string(),
            labels,
            annotations: BTreeMap::new(),
        }
    }

    /// Worker `ordinal` (1-based) of group `index`.
    pub fn worker(set_name: &str, namespace: &str, index: u32, ordinal: u32, revision: &str) -> Self {
        let mut unit = Self::leader(set_name, namespace, index, revision);
        unit.name = format!("{set_name}-{index}-{ordinal}");
        unit
    }

    fn label(&self, key: &'static str) -> CoreResult<&str> {
        self.labels
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| CoreError::MissingLabel {
                unit: self.name.clone(),
                label: key,
            })
    }

    pub fn set_name(&self) -> CoreResult<&str> {
        self.label(SET_NAME_LABEL)
    }

    pub fn revision(&self) -> CoreResult<&str> {
        self.label(REVISION_LABEL)
    }

    pub fn group_index(&self) -> CoreResult<u32> {
        let raw = self.label(GROUP_INDEX_LABEL)?;
        raw.parse().map_err(|_| CoreError::InvalidGroupIndex {
            unit: self.name.clone(),
            value: raw.to_string(),
        })
    }

    /// Group key carried by the unit.
    ///
    /// The annotation wins when present; otherwise the key is derived from
    /// the set-name, group-index, and revision labels.
    pub fn group_key(&self) -> CoreResult<String> {
        if let Some(key) = self.annotations.get(GROUP_NAME_ANNOTATION) {
            return Ok(key.clone());
        }
        self.derived_group_key()
    }

    /// Leaders are named `{set}-{index}`; workers carry an extra ordinal.
    pub fn is_leader(&self) -> CoreResult<bool> {
        let expected = format!("{}-{}", self.set_name()?, self.group_index()?);
        Ok(self.name == expected)
    }

    /// Group key computed from labels only, ignoring any annotation.
    pub fn derived_group_key(&self) -> CoreResult<String> {
        Ok(group_key(self.set_name()?, self.group_index()?, self.revision()?))
    }
}
