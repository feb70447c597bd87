//! API client for communicating with the account REST API.
//!
//! This module provides the `ApiClient` struct: four HTTP verbs that attach
//! the bearer token (when one is set) and decode JSON bodies, plus typed
//! wrappers for each auth and profile endpoint.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};
use tracing::debug;

use crate::models::{
    Credentials, PasswordChange, ProfileUpdate, SignupRequest, SignupResponse, TokenResponse,
    User,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

pub const SIGNUP_PATH: &str = "/auth/signup";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const CHANGE_PASSWORD_PATH: &str = "/auth/change-password";
pub const PROFILE_PATH: &str = "/profile/me";

/// Default HTTP request timeout in seconds.
/// The remote contract defines none; 30s fails fast enough for an interactive client.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// API client for the account service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    /// Same client with no credential attached.
    pub fn anonymous(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: None,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(ref token) = self.token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .client
            .request(method, self.url(path))
            .headers(self.auth_headers()?))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request and decode its body. An empty body decodes as JSON
    /// `null`, so `IgnoredAny` and `Option<T>` targets accept 204 responses.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(%method, path, authenticated = self.token.is_some(), "Sending request");

        let response = request.send().await?;
        let status = response.status();
        let response = Self::check_response(response).await.inspect_err(|e| {
            debug!(%method, path, status = status.as_u16(), error = %e, "Request failed");
        })?;

        let bytes = response.bytes().await?;
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        Ok(serde_json::from_slice(body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path)?;
        self.execute(Method::GET, path, request).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(Method::POST, path, request).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path)?;
        self.execute(Method::POST, path, request).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::PUT, path)?.json(body);
        self.execute(Method::PUT, path, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::DELETE, path)?;
        self.execute(Method::DELETE, path, request).await
    }

    // ===== Endpoint Methods =====

    /// Exchange credentials for an access token
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        self.post(LOGIN_PATH, credentials).await
    }

    /// Register a new account. The body may or may not carry a token.
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        let response: Option<SignupResponse> = self.post(SIGNUP_PATH, request).await?;
        Ok(response.unwrap_or_default())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let _: IgnoredAny = self.post_empty(LOGOUT_PATH).await?;
        Ok(())
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let _: IgnoredAny = self.post(CHANGE_PASSWORD_PATH, change).await?;
        Ok(())
    }

    /// Fetch the authenticated user's profile
    pub async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.get(PROFILE_PATH).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.put(PROFILE_PATH, update).await
    }

    pub async fn delete_account(&self) -> Result<(), ApiError> {
        let _: IgnoredAny = self.delete(PROFILE_PATH).await?;
        Ok(())
    }
}
