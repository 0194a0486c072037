//! Common error types for the gateway and its backend adapters

use thiserror::Error;

/// Startup configuration errors. These are fatal: the process reports the
/// problem and refuses to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two descriptors claim the same (or an overlapping) URL prefix
    #[error("route prefix '{new}' collides with registered prefix '{existing}'")]
    PrefixCollision { new: String, existing: String },

    /// A descriptor declared an empty prefix
    #[error("route prefix must not be empty")]
    EmptyPrefix,

    /// A descriptor declared a malformed prefix
    #[error("invalid route prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// The configured listen interface could not be parsed
    #[error("invalid listen address '{addr}': {reason}")]
    ListenAddress { addr: String, reason: String },

    /// The configuration file could not be read or parsed
    #[error("configuration file '{path}': {reason}")]
    File { path: String, reason: String },
}

/// Errors raised while constructing a backend service handler.
///
/// These are non-fatal to the gateway: the affected service is reported
/// as degraded and the remaining services are mounted normally.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The remote engine URL could not be parsed into a network target
    #[error("invalid engine target '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    /// The configured terminal command could not be resolved
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// The configured working directory is missing or not a directory
    #[error("working directory not usable: {0}")]
    WorkingDir(String),

    /// Malformed or inconsistent service configuration
    #[error("invalid service configuration: {0}")]
    InvalidConfig(String),

    /// Underlying I/O failure during construction
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
