//! Error type for fallible, non-interactive operations (config files, language
//! model tables, override snapshots).
//!
//! Routine outcomes of typing, like an unknown reading or a delete at the end
//! of the buffer, are reported as `bool`/empty results by the grid and the
//! override model and never surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("override snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

pub type LatticeResult<T> = Result<T, LatticeError>;
