//! # larek-api: Web Larek Backend Client
//!
//! Async HTTP access to the two backend endpoints the storefront needs.
//!
//! ## Modules
//!
//! - [`client`] - `StoreApi` trait and the reqwest-based `LarekClient`
//! - [`error`] - `ApiError` and `ApiResult`
//!
//! The storefront depends on the [`StoreApi`] trait, never on
//! [`LarekClient`] directly, so tests can swap in an in-memory backend.

pub mod client;
pub mod error;

pub use client::{parse_http_url, ApiConfig, ApiListResponse, LarekClient, StoreApi, DEFAULT_TIMEOUT};
pub use error::{ApiError, ApiResult};
