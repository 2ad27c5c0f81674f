//! Error types for the live search controller.
//!
//! This module defines the centralized error type [`LiveSearchError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Fetch failures get their own cloneable type, [`FetchFailure`], because they travel
//! back into the state machine inside an [`Event`](crate::app::Event).

use thiserror::Error;

/// Why a partial fetch did not produce a fragment.
///
/// Both variants are caught at the fetch boundary, logged, and leave the displayed
/// list untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The request never produced a response (offline, CORS, aborted, body read error).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status code.
    #[error("server returned status {0}")]
    Status(u16),
}

/// The main error type for live search operations.
///
/// Most variants describe a condition the controller recovers from locally: the
/// search feature degrades to its last successful state rather than failing the page.
///
/// # Examples
///
/// ```
/// use livesearch::domain::{FetchFailure, LiveSearchError};
///
/// let err: LiveSearchError = FetchFailure::Status(503).into();
/// assert_eq!(err.to_string(), "fetch failed: server returned status 503");
/// ```
#[derive(Debug, Error)]
pub enum LiveSearchError {
    /// The partial fetch failed at the transport or status level.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchFailure),

    /// Fragment markup could not be parsed into elements.
    #[error("markup error: {0}")]
    Markup(String),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The embedding host (browser APIs, timers) rejected an operation.
    #[error("host error: {0}")]
    Host(String),
}

/// A specialized `Result` type for live search operations.
pub type Result<T> = std::result::Result<T, LiveSearchError>;
