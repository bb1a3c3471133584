//! Error types for logging sessions, decoding and configuration

use thiserror::Error;

/// Errors that can occur while opening a log session or writing to it
///
/// Writing while no session is open is not an error; those calls return
/// `Ok(0)` instead.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Not enough RAM for storage (free: {free}, need {required})")]
    InsufficientMemory { free: usize, required: usize },

    #[error("Storage initialization failed: {0}")]
    StorageInit(String),

    #[error("Could not create directory '{path}': {reason}")]
    DirectoryCreate { path: String, reason: String },

    #[error("No free file name left for prefix '{prefix}'")]
    FileAllocationExhausted { prefix: String },

    #[error("Could not open '{path}': {reason}")]
    FileOpen { path: String, reason: String },

    #[error("Could not allocate {len} bytes to copy the scratch buffer")]
    ScratchCopy { len: usize },

    #[error("Text formatter failed")]
    Format(#[from] std::fmt::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while decoding a binary log
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown sensor kind: {0}")]
    UnknownKind(u8),

    #[error("Truncated record: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Invalid timestamp header: {0:?}")]
    InvalidTextHeader(String),
}

/// Errors that can occur while loading a logger configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
