//! Error types for GaganNav

use thiserror::Error;

use crate::planning::PlanError;

/// GaganNav error type
#[derive(Error, Debug)]
pub enum GaganError {
    #[error("Connection failed: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Planning failed: {0}")]
    Planning(#[from] PlanError),
}

impl From<toml::de::Error> for GaganError {
    fn from(e: toml::de::Error) -> Self {
        GaganError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GaganError>;
