pub mod config;
pub mod error;
pub mod intstr;
pub mod labels;
pub mod revision;
pub mod types;
pub mod unit;

pub use config::ControllerConfig;
pub use error::{CoreError, CoreResult};
pub use intstr::{IntOrPercent, Rounding};
pub use labels::group_key;
pub use revision::revision_hash;
pub use types::*;
pub use unit::UnitMeta;
