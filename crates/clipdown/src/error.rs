//! Error types for clipping and delivery.

use std::time::Duration;

use thiserror::Error;

/// Errors that end a clip attempt.
///
/// Filtering, list repair and rendering never fail; they degrade instead.
/// Only parsing, settings access and note delivery surface here.
#[derive(Error, Debug)]
pub enum ClipError {
    /// Neither the HTML nor the plain-text selection carried any content.
    #[error("No selection found")]
    EmptySelection,

    /// The fragment could not be parsed, even after html5ever normalization.
    #[error("HTML parsing error: {0}")]
    Parse(String),

    /// Settings file could not be read or written.
    #[error("Settings error: {0}")]
    Settings(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delivery to the note service failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Reasons a richer renderer result was rejected in favour of the built-in one.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The renderer reported an error.
    #[error("renderer failed: {0}")]
    Failed(String),

    /// The renderer returned only whitespace.
    #[error("renderer returned empty output")]
    Empty,

    /// The renderer did not finish in time.
    #[error("renderer timed out after {0:?}")]
    Timeout(Duration),

    /// The renderer panicked on its worker thread.
    #[error("renderer panicked")]
    Panicked,
}

/// Failures at the note-service boundary.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// No API token is configured.
    #[error("API token not configured. Set it with --token, CLIPDOWN_TOKEN or the settings file.")]
    MissingToken,

    /// The service could not be reached.
    #[error("note service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("note service error: {status} - {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The response body was not what the endpoint promises.
    #[error("unexpected response from note service: {0}")]
    Decode(String),
}

/// Result type for clip operations.
pub type Result<T> = std::result::Result<T, ClipError>;
