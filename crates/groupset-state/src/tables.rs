//! redb table definitions for the constraint-group store.
//!
//! Values are JSON-serialized domain types stored as `&[u8]`.

use redb::TableDefinition;

/// Constraint groups keyed by `{namespace}/{group_key}`.
pub const CONSTRAINT_GROUPS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("constraint_groups");
