//! Profile and settings operations for the authenticated account.

use tracing::{info, warn};

use super::session::SessionState;
use super::SessionStore;
use crate::api::ApiError;
use crate::error::AccountError;
use crate::models::{PasswordChange, ProfileUpdate, User};

impl SessionStore {
    async fn current_token(&self) -> Result<String, AccountError> {
        self.inner
            .session
            .read()
            .await
            .token()
            .map(str::to_string)
            .ok_or(AccountError::NotAuthenticated)
    }

    /// A 401 on a profile call means the token is no longer accepted:
    /// drop the local session and report expiry instead of the raw error.
    async fn expire_if_unauthorized(&self, err: ApiError) -> AccountError {
        if err.is_unauthorized() {
            warn!("Token rejected, clearing session");
            self.discard_token();
            self.set_state(SessionState::Anonymous).await;
            AccountError::SessionExpired
        } else {
            err.into()
        }
    }

    async fn replace_user(&self, user: User) {
        let mut session = self.inner.session.write().await;
        if let SessionState::Authenticated { user: cached, .. } = &mut session.state {
            *cached = user;
        }
    }

    /// Re-fetch the profile and refresh the cached copy.
    pub async fn refresh_profile(&self) -> Result<User, AccountError> {
        let _guard = self.inner.op_lock.lock().await;
        let token = self.current_token().await?;

        match self.inner.api.with_token(token).fetch_profile().await {
            Ok(user) => {
                self.replace_user(user.clone()).await;
                Ok(user)
            }
            Err(e) => Err(self.expire_if_unauthorized(e).await),
        }
    }

    /// `PUT /profile/me`; the cached user becomes the server's answer.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AccountError> {
        let _guard = self.inner.op_lock.lock().await;
        let token = self.current_token().await?;

        match self.inner.api.with_token(token).update_profile(update).await {
            Ok(user) => {
                self.replace_user(user.clone()).await;
                info!(user_id = %user.id, "Profile updated");
                Ok(user)
            }
            Err(e) => Err(self.expire_if_unauthorized(e).await),
        }
    }

    /// Rotate the password. Session state is untouched; a rejected current
    /// password comes back as the server's error, not as an expiry.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), AccountError> {
        let _guard = self.inner.op_lock.lock().await;
        let token = self.current_token().await?;

        self.inner.api.with_token(token).change_password(change).await?;
        info!("Password changed");
        Ok(())
    }

    /// Delete the account, then clear the local session. No remote logout
    /// is attempted since the account no longer exists.
    pub async fn delete_account(&self) -> Result<(), AccountError> {
        let _guard = self.inner.op_lock.lock().await;
        let token = self.current_token().await?;

        if let Err(e) = self.inner.api.with_token(token).delete_account().await {
            return Err(self.expire_if_unauthorized(e).await);
        }

        self.set_state(SessionState::Anonymous).await;
        self.inner.tokens.clear()?;
        info!("Account deleted");
        Ok(())
    }
}
