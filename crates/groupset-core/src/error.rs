//! Error types for model parsing and unit metadata.

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value {0:?}: expected an integer or a percentage like \"25%\"")]
    InvalidIntOrPercent(String),

    #[error("unit {unit} is missing label {label}")]
    MissingLabel { unit: String, label: &'static str },

    #[error("unit {unit} has invalid group index {value:?}")]
    InvalidGroupIndex { unit: String, value: String },
}
