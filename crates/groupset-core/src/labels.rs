//! Label and annotation keys shared by every unit of a group.

/// Name of the owning group set.
pub const SET_NAME_LABEL: &str = "groupset.io/name";

/// Decimal index of the group within its set.
pub const GROUP_INDEX_LABEL: &str = "groupset.io/group-index";

/// Template revision that produced the group.
pub const REVISION_LABEL: &str = "groupset.io/template-revision-hash";

/// Precomputed group key, read by the gang scheduler to find the constraint group.
pub const GROUP_NAME_ANNOTATION: &str = "scheduling.groupset.io/group-name";

/// Deterministic key of the constraint group for one (group, revision) pair.
///
/// Any component that knows the set name, group index, and revision can
/// derive it without a lookup.
pub fn group_key(set_name: &str, group_index: u32, revision: &str) -> String {
    format!("{set_name}-{group_index}-{revision}")
}
