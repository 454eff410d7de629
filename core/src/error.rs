//! Error types for the checkpoint-core library.

use thiserror::Error;

/// Result type alias for checkpoint operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading tokens, driving hardware or talking
/// to the verification service.
#[derive(Error, Debug)]
pub enum Error {
    /// The token reader failed or its input was closed.
    #[error("Token reader fault: {0}")]
    Sensor(String),

    /// A scanned token was empty after trimming.
    #[error("Token is empty")]
    InvalidToken,

    /// Still capture failed.
    #[error("Camera capture failed: {0}")]
    Camera(String),

    /// A GPIO line could not be acquired or driven.
    #[error("GPIO error: {0}")]
    Gpio(String),

    /// Network failure or request timeout.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
