use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::TokenStore;
use crate::api::ApiClient;
use crate::error::AccountError;
use crate::models::{Credentials, SignupRequest, User};

/// Authentication status as seen by readers of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum AuthStatus {
    /// Nothing checked yet (process just started).
    Unknown,
    /// Hydrating from the persisted token.
    Loading,
    Authenticated,
    Anonymous,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStatus::Unknown => write!(f, "unknown"),
            AuthStatus::Loading => write!(f, "loading"),
            AuthStatus::Authenticated => write!(f, "authenticated"),
            AuthStatus::Anonymous => write!(f, "anonymous"),
        }
    }
}

/// The user is present exactly when the state is `Authenticated`.
#[derive(Clone, Default)]
pub(super) enum SessionState {
    #[default]
    Unknown,
    Loading,
    Authenticated {
        token: String,
        user: User,
    },
    Anonymous,
}

/// Settled, client-local record of authentication status and cached profile.
#[derive(Clone, Default)]
pub struct Session {
    pub(super) state: SessionState,
}

impl Session {
    pub fn status(&self) -> AuthStatus {
        match self.state {
            SessionState::Unknown => AuthStatus::Unknown,
            SessionState::Loading => AuthStatus::Loading,
            SessionState::Authenticated { .. } => AuthStatus::Authenticated,
            SessionState::Anonymous => AuthStatus::Anonymous,
        }
    }

    /// Get the bearer token if authenticated
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status())
            .field("user", &self.user())
            .finish()
    }
}

/// What `signup` did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Account created; the caller still has to log in.
    Registered,
    /// Account created and the session is now authenticated.
    Authenticated(User),
    /// Account created, but the follow-up login did not complete. The
    /// session is unchanged; `reason` is a user-facing message.
    AutoLoginFailed { reason: String },
}

pub(super) struct Inner {
    pub(super) api: ApiClient,
    pub(super) tokens: Arc<dyn TokenStore>,
    pub(super) session: RwLock<Session>,
    /// Serializes mutating operations; at most one is in flight.
    pub(super) op_lock: Mutex<()>,
    pub(super) auto_login_on_signup: bool,
}

/// Shared handle to the session. Clone is cheap; all clones see the same
/// state. State only changes through the operations on this type, and each
/// operation writes its result in one step after the remote call resolves.
#[derive(Clone)]
pub struct SessionStore {
    pub(super) inner: Arc<Inner>,
}

impl SessionStore {
    /// `api` should carry no token; the store attaches its own.
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>, auto_login_on_signup: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                api: api.anonymous(),
                tokens,
                session: RwLock::new(Session::default()),
                op_lock: Mutex::new(()),
                auto_login_on_signup,
            }),
        }
    }

    pub fn auto_login_on_signup(&self) -> bool {
        self.inner.auto_login_on_signup
    }

    /// Copy of the current settled state.
    pub async fn snapshot(&self) -> Session {
        self.inner.session.read().await.clone()
    }

    pub async fn status(&self) -> AuthStatus {
        self.inner.session.read().await.status()
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.session.read().await.user().cloned()
    }

    /// Gateway with the current token attached (anonymous when logged out).
    pub async fn api(&self) -> ApiClient {
        match self.inner.session.read().await.token() {
            Some(token) => self.inner.api.with_token(token),
            None => self.inner.api.clone(),
        }
    }

    pub(super) async fn set_state(&self, state: SessionState) {
        self.inner.session.write().await.state = state;
    }

    /// Best-effort removal of the persisted token.
    pub(super) fn discard_token(&self) {
        if let Err(e) = self.inner.tokens.clear() {
            warn!(error = %e, "Failed to remove stored token");
        }
    }

    /// Hydrate from the persisted token. Always settles on `Authenticated`
    /// or `Anonymous`; a token that cannot be used is removed.
    pub async fn initialize(&self) -> AuthStatus {
        let _guard = self.inner.op_lock.lock().await;
        self.set_state(SessionState::Loading).await;

        let state = match self.inner.tokens.load() {
            Ok(None) => {
                debug!("No stored token");
                SessionState::Anonymous
            }
            Ok(Some(token)) if token.trim().is_empty() => {
                warn!("Stored token is blank, discarding");
                self.discard_token();
                SessionState::Anonymous
            }
            Ok(Some(token)) => match self.inner.api.with_token(token.as_str()).fetch_profile().await {
                Ok(user) => {
                    info!(user_id = %user.id, "Session restored");
                    SessionState::Authenticated { token, user }
                }
                Err(e) => {
                    if e.is_unauthorized() {
                        info!("Stored token rejected, session expired");
                    } else {
                        warn!(error = %e, "Session check failed");
                    }
                    self.discard_token();
                    SessionState::Anonymous
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                self.discard_token();
                SessionState::Anonymous
            }
        };

        self.set_state(state).await;
        self.status().await
    }

    /// Fetch the profile with `token`, persist the token, then publish the
    /// authenticated state. Nothing changes if any step fails.
    async fn establish(&self, token: String) -> Result<User, AccountError> {
        let user = self.inner.api.with_token(token.as_str()).fetch_profile().await?;
        self.inner.tokens.save(&token)?;
        self.set_state(SessionState::Authenticated {
            token,
            user: user.clone(),
        })
        .await;
        Ok(user)
    }

    /// Authenticate with email and password. On failure the previous
    /// session (in memory and persisted) is left as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AccountError> {
        let _guard = self.inner.op_lock.lock().await;
        debug!(email = %credentials.email, "Logging in");

        let token = self.inner.api.login(credentials).await?.access_token;
        let user = self.establish(token).await?;

        info!(user_id = %user.id, "Login successful");
        Ok(user)
    }

    /// Register an account. With auto-login enabled the session is
    /// authenticated afterwards, using the token from the signup response
    /// or, when there is none, a regular login. Only a failed registration
    /// is an error; a failed follow-up login is `AutoLoginFailed`.
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupOutcome, AccountError> {
        let _guard = self.inner.op_lock.lock().await;
        debug!(email = %request.email, "Signing up");

        let response = self.inner.api.signup(request).await?;
        info!("Account registered");

        if !self.inner.auto_login_on_signup {
            return Ok(SignupOutcome::Registered);
        }

        match self.auto_login(request, response.access_token).await {
            Ok(user) => Ok(SignupOutcome::Authenticated(user)),
            Err(e) => {
                warn!(error = %e, "Account created but automatic login failed");
                Ok(SignupOutcome::AutoLoginFailed {
                    reason: e.user_message("Automatic login failed"),
                })
            }
        }
    }

    async fn auto_login(
        &self,
        request: &SignupRequest,
        token: Option<String>,
    ) -> Result<User, AccountError> {
        let token = match token {
            Some(token) => token,
            None => {
                debug!("Signup response carried no token, logging in");
                self.inner.api.login(&request.credentials()).await?.access_token
            }
        };
        self.establish(token).await
    }

    /// Tell the server (best effort), then drop the local session no matter
    /// what the server said. A storage error is reported after the in-memory
    /// state has already been reset.
    pub async fn logout(&self) -> Result<(), AccountError> {
        let _guard = self.inner.op_lock.lock().await;

        let token = match self.inner.session.read().await.token() {
            Some(token) => Some(token.to_string()),
            None => self.inner.tokens.load().ok().flatten(),
        };

        if let Some(token) = token {
            if let Err(e) = self.inner.api.with_token(token).logout().await {
                warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }

        self.set_state(SessionState::Anonymous).await;
        self.inner.tokens.clear()?;
        info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "1".to_string(),
            email: "a@b.co".to_string(),
            name: None,
            bio: None,
        }
    }

    #[test]
    fn test_user_present_iff_authenticated() {
        let mut session = Session::default();
        assert_eq!(session.status(), AuthStatus::Unknown);
        assert!(session.user().is_none());
        assert!(session.token().is_none());

        session.state = SessionState::Loading;
        assert!(session.user().is_none());

        session.state = SessionState::Authenticated {
            token: "t".to_string(),
            user: user(),
        };
        assert_eq!(session.status(), AuthStatus::Authenticated);
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("t"));
        assert!(session.user().is_some());

        session.state = SessionState::Anonymous;
        assert!(session.user().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session {
            state: SessionState::Authenticated {
                token: "super-secret".to_string(),
                user: user(),
            },
        };
        let debug = format!("{:?}", session);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("Authenticated"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AuthStatus::Authenticated.to_string(), "authenticated");
        assert_eq!(AuthStatus::Anonymous.to_string(), "anonymous");
    }
}
