//! Data models for the account API.
//!
//! This module contains the structures exchanged with the remote service:
//!
//! - `User`: the authenticated account's profile
//! - Request bodies: `Credentials`, `SignupRequest`, `ProfileUpdate`, `PasswordChange`
//! - Response bodies: `TokenResponse`, `SignupResponse`, `ApiErrorBody`

pub mod requests;
pub mod user;

pub use requests::{
    ApiErrorBody, Credentials, PasswordChange, ProfileUpdate, SignupRequest, SignupResponse,
    TokenResponse,
};
pub use user::User;
