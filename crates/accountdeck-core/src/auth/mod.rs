//! Authentication module for managing the user session and its token.
//!
//! This module provides:
//! - `SessionStore`: shared session handle with initialize/login/signup/logout
//!   and the profile/settings operations of the authenticated account
//! - `TokenStore`: persistent bearer-token storage (keychain, file or memory)
//!
//! The persisted token is the durable source of truth; the cached user is
//! rebuilt from it by `SessionStore::initialize` on every start.

mod account;
pub mod session;
pub mod token_store;

pub use session::{AuthStatus, Session, SessionStore, SignupOutcome};
pub use token_store::{
    FileTokenStore, KeyringTokenStore, MemoryTokenStore, StorageError, TokenStore,
};
