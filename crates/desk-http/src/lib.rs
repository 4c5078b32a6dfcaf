//! # desk-http
//!
//! The single choke point for every request orgdesk sends.
//!
//! [`ApiClient`] resolves endpoints against the configured base URL, attaches
//! the bearer token from the [`desk_session::TokenStore`] while it is valid,
//! applies a fixed timeout, decodes every body into an
//! [`desk_core::ApiResponse`] and maps failures onto [`ApiError`].

mod client;
mod decode;
mod error;
mod query;

#[cfg(any(test, feature = "mock-server"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use client::{ApiClient, FileUpload, RequestBody, RequestOptions};
pub use decode::expect_data;
pub use error::ApiError;
pub use query::QueryParams;
pub use reqwest::Method;
