//! Pinterest OAuth 2.0 authorization-code flow.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::utf8_percent_encode;
use pinforge_core::AppConfig;
use pinforge_store::Store;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::error::PlatformError;
use crate::transport::{read_json, FallbackTransport, URI_COMPONENT};

/// Comma-separated v5 scopes requested at authorization time.
pub const REQUIRED_SCOPES: &str =
    "boards:read,boards:write,pins:read,pins:write,user_accounts:read";

#[derive(Clone)]
pub struct OAuthConfig {
    pub app_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub oauth_base: String,
    pub api_base: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("app_id", &self.app_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("redirect_uri", &self.redirect_uri)
            .field("oauth_base", &self.oauth_base)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl OAuthConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            app_id: config.pinterest_app_id.clone(),
            client_secret: config.pinterest_client_secret.clone(),
            redirect_uri: config.pinterest_redirect_uri.clone(),
            oauth_base: config.pinterest_oauth_base.clone(),
            api_base: config.pinterest_api_base.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Random base-36 state token for CSRF protection.
#[must_use]
pub fn generate_state() -> String {
    to_base36(rand::random::<u32>())
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Build the consent URL for `state`.
#[must_use]
pub fn authorize_url(config: &OAuthConfig, state: &str) -> String {
    let params = [
        format!("client_id={}", config.app_id.trim()),
        format!("redirect_uri={}", encode(config.redirect_uri.trim())),
        "response_type=code".to_string(),
        format!("scope={}", encode(REQUIRED_SCOPES)),
        format!("state={state}"),
    ]
    .join("&");
    format!("{}?{params}", config.oauth_base.trim_end_matches('/'))
}

/// Constant-time comparison of the stored and returned state values.
#[must_use]
pub fn states_match(expected: &str, received: &str) -> bool {
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}

/// Drives the authorization flow and persists its state and token.
pub struct PinterestAuth {
    transport: FallbackTransport,
    config: OAuthConfig,
    store: Store,
}

impl PinterestAuth {
    #[must_use]
    pub fn new(transport: FallbackTransport, config: OAuthConfig, store: Store) -> Self {
        Self {
            transport,
            config,
            store,
        }
    }

    /// Generate and persist a fresh state, returning the consent URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Store`] if the state cannot be saved.
    pub async fn authorization_url(&self) -> Result<String, PlatformError> {
        let state = generate_state();
        self.store.save_oauth_state(&state).await?;
        let url = authorize_url(&self.config, &state);
        tracing::info!(
            client_id = %self.config.app_id.trim(),
            redirect_uri = %self.config.redirect_uri.trim(),
            scopes = REQUIRED_SCOPES,
            "built Pinterest authorization URL"
        );
        Ok(url)
    }

    /// Handle the OAuth callback: verify `state`, exchange `code` and save the
    /// resulting token.
    ///
    /// The pending state is consumed whether or not it matches.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::StateMismatch`] when no state is pending or it
    /// differs, or any error from [`PinterestAuth::exchange_code`].
    pub async fn complete(&self, code: &str, state: &str) -> Result<String, PlatformError> {
        let expected = self.store.take_oauth_state().await?;
        match expected {
            Some(expected) if states_match(&expected, state) => {}
            _ => {
                tracing::warn!("OAuth callback state mismatch");
                return Err(PlatformError::StateMismatch);
            }
        }

        let token = self.exchange_code(code).await?;
        self.store.save_token(&token).await?;
        tracing::info!("Pinterest account connected");
        Ok(token)
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingConfig`] without a client secret,
    /// [`PlatformError::Api`] / [`PlatformError::AuthRequired`] on a rejected
    /// exchange, or [`PlatformError::NetworkFailure`] when both transports fail.
    pub async fn exchange_code(&self, code: &str) -> Result<String, PlatformError> {
        let secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or(PlatformError::MissingConfig("PINTEREST_CLIENT_SECRET"))?;
        let credentials = STANDARD.encode(format!("{}:{}", self.config.app_id.trim(), secret.trim()));
        let body = format!(
            "grant_type=authorization_code&code={}&redirect_uri={}",
            encode(code),
            encode(self.config.redirect_uri.trim())
        );
        let url = format!("{}/oauth/token", self.config.api_base.trim_end_matches('/'));

        let response = self
            .transport
            .send(&url, |client, target| {
                client
                    .post(target)
                    .header("Authorization", format!("Basic {credentials}"))
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(body.clone())
            })
            .await?;
        let token: TokenResponse = read_json(response, "oauth/token").await.inspect_err(|e| {
            tracing::error!(error = %e, "token exchange failed");
        })?;
        Ok(token.access_token)
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Store`] if the token cannot be removed.
    pub async fn logout(&self) -> Result<(), PlatformError> {
        self.store.clear_token().await?;
        Ok(())
    }
}
