//! REST API gateway for the account service.
//!
//! This module provides the `ApiClient` for the auth and profile endpoints.
//! Authenticated calls carry the session's bearer token; failures surface
//! as a structured `ApiError` (network, HTTP status with detail, decode).

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
