//! # API Error Types
//!
//! Everything that can go wrong talking to the backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       API Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidUrl     │  │  Http           │  │  Api { status, msg }    │ │
//! │  │                 │  │  (timeout, DNS) │  │  Parse                  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by [`crate::StoreApi`] implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL is not an http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    ///
    /// `message` is the backend's `error` field when present, otherwise the
    /// status text.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Text suitable for showing to the customer.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Http(err) if err.is_timeout() => "The store did not respond in time".to_string(),
            ApiError::Http(_) => "Could not reach the store".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_messages() {
        let err = ApiError::Api {
            status: 400,
            message: "Неверная сумма заказа".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 400 - Неверная сумма заказа");
        assert_eq!(err.user_message(), "Неверная сумма заказа");

        let err = ApiError::Parse("missing field `items`".to_string());
        assert_eq!(err.user_message(), "Parse error: missing field `items`");
    }
}
