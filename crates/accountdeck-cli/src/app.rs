//! Command handlers.
//!
//! `App` is the composition root: it owns the configuration and the one
//! `SessionStore` every command goes through.

use accountdeck_core::forms::{password_strength, LoginForm, PasswordForm, ProfileForm, SignupForm};
use accountdeck_core::{
    score, AccountError, AuthStatus, Config, FieldErrors, SessionStore, SignupOutcome, User,
};
use anyhow::{anyhow, bail, Result};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::output::{
    render_bio_hint, render_field_errors, render_strength, render_user, render_user_summary,
};
use crate::prompt::{self, ENV_NEW_PASSWORD, ENV_PASSWORD};

/// Print the per-field messages and turn them into one error.
fn invalid(errors: FieldErrors) -> anyhow::Error {
    eprintln!("{}", render_field_errors(&errors));
    anyhow!("Please fix the fields above")
}

/// User-facing error for a failed account operation.
fn failed(err: AccountError, fallback: &str) -> anyhow::Error {
    warn!(error = %err, "{}", fallback);
    if let Some(errors) = err.field_errors() {
        eprintln!("{}", render_field_errors(errors));
    }
    anyhow!(err.user_message(fallback))
}

pub struct App {
    config: Config,
    session: SessionStore,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let session = config.session_store()?;
        Ok(Self { config, session })
    }

    /// Hydrate the session and return the logged-in user.
    async fn require_user(&self) -> Result<User> {
        if self.session.initialize().await != AuthStatus::Authenticated {
            bail!("Not logged in. Run `accountdeck login` first.");
        }
        self.session
            .user()
            .await
            .ok_or_else(|| anyhow!("Not logged in. Run `accountdeck login` first."))
    }

    fn remember_email(&mut self, email: &str) {
        if let Err(e) = self.config.remember_email(email) {
            warn!(error = %e, "Failed to save config");
        }
    }

    pub async fn status(&self) -> Result<()> {
        match self.session.initialize().await {
            AuthStatus::Authenticated => {
                if let Some(user) = self.session.user().await {
                    println!("Logged in\n{}", render_user_summary(&user));
                }
            }
            status => {
                info!(%status, "No active session");
                println!("Not logged in");
            }
        }
        Ok(())
    }

    pub async fn signup(&mut self, name: Option<String>, email: Option<String>) -> Result<()> {
        let name = prompt::value_or_prompt(name, "Name", None)?;
        let email = prompt::value_or_prompt(email, "Email", None)?;
        let password = prompt::password("Password", Some(ENV_PASSWORD))?;

        if let Some(strength) = password_strength(password.expose_secret()) {
            println!("Password strength: {}", strength);
        }

        let request = SignupForm::new(name, email.clone(), password.expose_secret())
            .into_request()
            .map_err(invalid)?;

        let outcome = self
            .session
            .signup(&request)
            .await
            .map_err(|e| failed(e, "Failed to create account"))?;
        self.remember_email(&email);

        match outcome {
            SignupOutcome::Registered => {
                println!("Account created! Log in with `accountdeck login`.");
            }
            SignupOutcome::Authenticated(user) => {
                println!("Account created. Welcome, {}!", user.display_name());
            }
            SignupOutcome::AutoLoginFailed { reason } => {
                println!("Account created, but logging in failed: {}", reason);
                println!("Log in with `accountdeck login`.");
            }
        }
        Ok(())
    }

    pub async fn login(&mut self, email: Option<String>) -> Result<()> {
        let last_email = self.config.last_email.clone();
        let email = prompt::value_or_prompt(email, "Email", last_email.as_deref())?;
        let password = prompt::password("Password", Some(ENV_PASSWORD))?;

        let credentials = LoginForm::new(email.clone(), password.expose_secret())
            .into_request()
            .map_err(invalid)?;

        let user = self
            .session
            .login(&credentials)
            .await
            .map_err(|e| failed(e, "Login failed"))?;
        self.remember_email(&email);

        println!("Login successful! Welcome back, {}.", user.display_name());
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.session
            .logout()
            .await
            .map_err(|e| failed(e, "Failed to log out"))?;
        println!("Logged out.");
        Ok(())
    }

    pub async fn profile(&self) -> Result<()> {
        let user = self.require_user().await?;
        let (name, bio) = user.editable_fields();
        println!("{}", render_user(&user));
        println!("{}", render_strength(&score(&name, &bio)));
        Ok(())
    }

    pub async fn edit(&self, name: Option<String>, bio: Option<String>) -> Result<()> {
        let user = self.require_user().await?;
        let mut form = ProfileForm::from_user(&user);

        if name.is_none() && bio.is_none() {
            form.name = prompt::line("Name", Some(form.name.as_str()))?;
            form.bio = prompt::line("Bio", Some(form.bio.as_str()))?;
        } else {
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(bio) = bio {
                form.bio = bio;
            }
        }
        println!("{}", render_bio_hint(&form.bio));

        let update = form.into_request().map_err(invalid)?;
        let user = self
            .session
            .update_profile(&update)
            .await
            .map_err(|e| failed(e, "Failed to update profile"))?;

        println!("Profile updated successfully!\n{}", render_user(&user));
        let (name, bio) = user.editable_fields();
        println!("{}", render_strength(&score(&name, &bio)));
        Ok(())
    }

    pub async fn change_password(&self) -> Result<()> {
        self.require_user().await?;

        let old_password = prompt::password("Current password", Some(ENV_PASSWORD))?;
        let new_password = prompt::password("New password", Some(ENV_NEW_PASSWORD))?;
        let confirm_password = prompt::password("Confirm new password", Some(ENV_NEW_PASSWORD))?;

        let form = PasswordForm::new(
            old_password.expose_secret(),
            new_password.expose_secret(),
            confirm_password.expose_secret(),
        );
        if let Some(strength) = password_strength(&form.new_password) {
            println!("New password strength: {}", strength);
        }
        let change = form.into_request().map_err(invalid)?;

        self.session
            .change_password(&change)
            .await
            .map_err(|e| failed(e, "Failed to change password"))?;
        println!("Password changed successfully.");
        Ok(())
    }

    pub async fn delete_account(&self, yes: bool) -> Result<()> {
        let user = self.require_user().await?;

        if !yes {
            let question = format!(
                "Delete the account {}? This cannot be undone.",
                user.email
            );
            if !prompt::confirm(&question)? {
                println!("Cancelled.");
                return Ok(());
            }
        }

        self.session
            .delete_account()
            .await
            .map_err(|e| failed(e, "Failed to delete account"))?;
        println!("Account deleted.");
        Ok(())
    }

    /// Offline scoring of a name and bio.
    pub fn strength(name: &str, bio: &str) {
        println!("{}", render_bio_hint(bio));
        println!("{}", render_strength(&score(name, bio)));
    }
}
