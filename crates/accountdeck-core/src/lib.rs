//! Core library for accountdeck.
//!
//! Shared by the command-line client (and any other front end) to talk to the
//! account REST API:
//!
//! - `api`: HTTP gateway with bearer-token auth and structured errors
//! - `auth`: session store and persistent token storage
//! - `forms`: per-screen input validators
//! - `strength`: profile completeness heuristic
//! - `models`: request/response types for the account API
//! - `config`: on-disk configuration with environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod strength;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthStatus, Session, SessionStore, SignupOutcome, TokenStore};
pub use config::Config;
pub use error::AccountError;
pub use forms::FieldErrors;
pub use models::User;
pub use strength::{score, ProfileStrength, StrengthLabel};
