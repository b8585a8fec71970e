//! Error types for kraken_core

use std::io;
use thiserror::Error;

/// Errors raised while loading interface configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error when reading the file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("Config parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("Invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised by the scene-graph property seam
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("Unknown property: {0}")]
    Unknown(String),

    #[error("Property is hidden: {0}")]
    Hidden(String),

    #[error("Type mismatch for {prop}: expected {expected}")]
    TypeMismatch { prop: String, expected: &'static str },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
