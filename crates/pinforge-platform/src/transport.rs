//! HTTP transport with a one-time proxy fallback.
//!
//! Requests go direct first. When that fails at the network level (connect
//! error, timeout, or send failure) the same request is replayed once through
//! `{proxy_base}{percent-encoded url}`.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::PlatformError;

/// Characters left unescaped when embedding a URL in the proxy path, matching
/// the usual URI-component encoding.
pub(crate) const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone)]
pub struct FallbackTransport {
    client: Client,
    proxy_base: Option<String>,
}

impl FallbackTransport {
    /// # Errors
    ///
    /// Returns [`PlatformError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout: Duration, proxy_base: Option<String>) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent("pinforge/0.1")
            .build()?;
        Ok(Self {
            client,
            proxy_base: proxy_base.filter(|p| !p.trim().is_empty()),
        })
    }

    /// The proxied form of `url`.
    #[must_use]
    pub fn proxied_url(proxy_base: &str, url: &str) -> String {
        format!("{proxy_base}{}", utf8_percent_encode(url, URI_COMPONENT))
    }

    /// Send a request built by `build`, retrying once through the proxy on a
    /// network-class failure.
    ///
    /// `build` is called once per attempt so request bodies can be rebuilt.
    /// A non-2xx response is returned as-is for the caller to classify.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NetworkFailure`] when the fallback also fails,
    /// or [`PlatformError::Http`] for non-network errors on the direct attempt.
    pub async fn send<F>(&self, url: &str, build: F) -> Result<Response, PlatformError>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let direct = build(&self.client, url).send().await;
        let error = match direct {
            Ok(response) => return Ok(response),
            Err(e) if is_network_failure(&e) => e,
            Err(e) => return Err(PlatformError::Http(e)),
        };

        let Some(proxy_base) = &self.proxy_base else {
            return Err(PlatformError::NetworkFailure(error.to_string()));
        };

        tracing::warn!(url, error = %error, "direct request failed; retrying through proxy");
        let proxied = Self::proxied_url(proxy_base, url);
        build(&self.client, &proxied)
            .send()
            .await
            .map_err(|e| PlatformError::NetworkFailure(e.to_string()))
    }
}

fn is_network_failure(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}

/// Map a non-success Pinterest response to a [`PlatformError`].
///
/// 401 is an auth failure; anything else keeps the API's `message` when the
/// body carries one.
pub(crate) fn api_error(status: u16, body: &str) -> PlatformError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("API Error {status}: {body}"));
    if status == 401 {
        return PlatformError::AuthRequired(message);
    }
    PlatformError::Api { status, message }
}

/// Read a response body as `T`, classifying non-2xx statuses.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, PlatformError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| PlatformError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
