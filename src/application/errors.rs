//! Application layer errors

use crate::domain::entities::AddConflict;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Host error: {0}")]
    Host(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Counter command failures; each one renders as plain reply text
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("name or alias conflicts")]
    Conflicts(Vec<AddConflict>),

    #[error("counter not found: {0}")]
    NotFound(String),

    #[error("permission denied")]
    PermissionDenied,
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save worker failed: {0}")]
    Worker(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),
}
