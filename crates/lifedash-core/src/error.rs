//! Core error types for lifedash-core.
//!
//! This module defines the error hierarchy using thiserror. `ApiError` is
//! deliberately `Clone` (String payloads instead of `#[source]` chains):
//! deduplicated request results are broadcast to every waiting caller, and
//! `tokio::sync::broadcast` requires the payload to be cloneable.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lifedash-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Remote API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the remote dashboard API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Credential rejected; the caller must clear the stored token.
    #[error("Not authenticated (401)")]
    Unauthorized,

    /// Non-2xx response other than 401.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Transport-level failure (DNS, connection reset, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Endpoint path could not be joined onto the base URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The deduplicated in-flight request was dropped before settling.
    #[error("Deduplicated request was cancelled")]
    Cancelled,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be created
    #[error("Failed to create data directory {path}: {message}")]
    CreateDirFailed { path: PathBuf, message: String },

    /// No usable config/data directory on this platform
    #[error("Could not resolve a home directory for configuration")]
    NoHomeDir,
}

/// Validation errors. These are rejected synchronously and never reach the
/// network layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name is empty after trimming
    #[error("Task name must not be empty")]
    EmptyTaskName,

    /// Task name exceeds the allowed length
    #[error("Task name exceeds {max} characters (got {len})")]
    TaskNameTooLong { max: usize, len: usize },

    /// Waiting queue already holds the maximum number of tasks
    #[error("Task queue is full ({max} waiting tasks)")]
    QueueFull { max: usize },

    /// Unknown dashboard card id
    #[error("Unknown card id: {0}")]
    UnknownCard(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
