//! Domain error types

use thiserror::Error;

/// Error when parsing an elapsed-time string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>ms, <number>s, <number>m, or <number>m<number>s (e.g., 500ms, 5s, 1m, 2m30s)")]
pub struct ElapsedParseError {
    pub input: String,
}

/// Error when an unknown transport name is configured
#[derive(Debug, Clone, Error)]
#[error("Invalid transport: \"{input}\". Valid transports are: http, bus")]
pub struct TransportKindParseError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },
}
