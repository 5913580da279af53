//! Error types for Karma.
//!
//! Normalization and classification never fail; these cover the
//! surrounding I/O (config, preferences, payload files).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KarmaError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl KarmaError {
    /// Process exit code used by karmactl for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            KarmaError::Config(_) | KarmaError::Toml(_) => 78,
            KarmaError::Preferences(_) => 73,
            KarmaError::Io(_) => 74,
            KarmaError::Json(_) => 65,
        }
    }
}

pub type Result<T> = std::result::Result<T, KarmaError>;
