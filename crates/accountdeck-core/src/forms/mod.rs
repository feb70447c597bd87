//! Form validators for each account screen.
//!
//! Validators are pure and synchronous. A form's `validate()` returns
//! `FieldErrors` with an entry for every field in the form (an empty message
//! means the field is valid). `into_request()` turns a valid form into the
//! request body for the matching endpoint, or hands back the errors.

pub mod fields;
pub mod login;
pub mod password;
pub mod profile;
pub mod signup;

pub use fields::{password_strength, FieldErrors, PasswordStrength};
pub use login::LoginForm;
pub use password::PasswordForm;
pub use profile::ProfileForm;
pub use signup::SignupForm;
