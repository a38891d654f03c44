//! groupset-state: constraint-group store for group sets.
//!
//! Backed by [redb](https://docs.rs/redb). Each group, at each revision, owns
//! exactly one [`ConstraintGroup`]; the store exposes it through the narrow
//! [`ConstraintGroupStore`] capability (`get` + insert-if-absent `create`) so
//! callers can be tested against the in-memory backend or a wrapper.
//!
//! # Architecture
//!
//! Values are JSON-serialized into redb's `&[u8]` value columns under
//! `{namespace}/{group_key}` keys. The `StateStore` is `Clone` + `Send` +
//! `Sync` (backed by `Arc<Database>`) and can be shared across tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::{ConstraintGroupStore, StateStore};
pub use types::*;
