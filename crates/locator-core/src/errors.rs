//! Shared error types

use thiserror::Error;

/// Recoverable locator failures. None of these should take the page down;
/// callers log them and keep the map interactive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocatorError {
    #[error("map style failed to load: {0}")]
    StyleLoad(String),

    #[error("location feed unavailable: {0}")]
    Feed(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
