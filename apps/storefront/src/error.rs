//! # Storefront Error Types
//!
//! Errors surfaced by the terminal session.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in the Storefront                        │
//! │                                                                         │
//! │  typed line ──► UserCommand::from_str ── InputError ───────┐            │
//! │       │                                                    │            │
//! │       ▼                                                    │            │
//! │  view intent ──► bus.publish ── CoreError (handler) ───────┤            │
//! │       │                                                    ▼            │
//! │       │                                               AppError ──► shell│
//! │       ▼                                                 prints it,      │
//! │  backend worker ── ApiError ──► OrderFailed event       keeps running   │
//! │                                 (never an AppError)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use larek_api::ApiError;
use larek_core::CoreError;
use thiserror::Error;

/// Result type alias for storefront operations.
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Problems loading or validating `storefront.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::config::StorefrontConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required URL is empty.
    #[error("{0} must be set")]
    MissingUrl(&'static str),

    /// A URL is set but is not http(s).
    #[error("Invalid URL for {field}: {message}")]
    InvalidUrl { field: &'static str, message: String },

    /// Any other out-of-range value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Input Errors
// =============================================================================

/// A typed line that could not be turned into an intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Blank line.
    #[error("Type a command, or `help`")]
    Empty,

    /// First word is not a command.
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// Command needs an argument.
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    /// Index is not a positive number.
    #[error("Not a valid position: {0}")]
    InvalidIndex(String),

    /// Index past the end of the list on screen.
    #[error("No item at position {index} (list has {len})")]
    OutOfRange { index: usize, len: usize },

    /// No item matches the given id.
    #[error("No catalog item with id {0}")]
    UnknownItem(String),

    /// Command does not apply to what is on screen.
    #[error("`{command}` is not available here: {hint}")]
    NotAvailable {
        command: &'static str,
        hint: &'static str,
    },

    /// The button behind the command is disabled.
    #[error("{0}")]
    Disabled(String),
}

// =============================================================================
// Application Error
// =============================================================================

/// Top-level error for the storefront binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Input(#[from] InputError),

    /// Terminal I/O failed.
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pass_through() {
        let err: AppError = CoreError::EmptyCart.into();
        assert_eq!(err.to_string(), "Basket is empty");

        let err: AppError = InputError::OutOfRange { index: 4, len: 2 }.into();
        assert_eq!(err.to_string(), "No item at position 4 (list has 2)");

        let err: AppError = ConfigError::MissingUrl("api.base_url").into();
        assert_eq!(err.to_string(), "api.base_url must be set");
    }
}
