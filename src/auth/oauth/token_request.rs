//! Authorization code exchange.
//!
//! [`TokenExchangeClient`] performs the last network step of the flow:
//!
//! ```text
//! POST https://{shop}/admin/oauth/access_token
//! Content-Type: application/x-www-form-urlencoded
//!
//! client_id={api_key}&client_secret={api_secret}&code={code}
//! ```
//!
//! Each request is bounded by a timeout and is never retried: an
//! authorization code is single use, so a second attempt can only fail.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_oauth::TokenExchangeClient;
//! use std::time::Duration;
//!
//! let client = TokenExchangeClient::new().with_timeout(Duration::from_secs(5));
//! let token = client.exchange(&config, &shop, &code).await?;
//! println!("Obtained token for {}", token.shop);
//! ```

use crate::auth::oauth::OAuthError;
use crate::auth::{AccessToken, AccessTokenResponse};
use crate::config::{OAuthConfig, ShopDomain};
use chrono::Utc;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Serialize;
use std::time::Duration;

/// Default upper bound on a single token request.
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response body excerpt kept in [`OAuthError::TokenExchange`].
const MAX_BODY_EXCERPT: usize = 512;

const CLIENT_USER_AGENT: &str = concat!("shopify-oauth/", env!("CARGO_PKG_VERSION"));

/// Form body of the code exchange.
#[derive(Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// HTTP client for `POST /admin/oauth/access_token`.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct TokenExchangeClient {
    http: reqwest::Client,
    timeout: Duration,
    base_url: Option<String>,
}

impl TokenExchangeClient {
    /// Creates a client with [`DEFAULT_TOKEN_TIMEOUT`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout: DEFAULT_TOKEN_TIMEOUT,
            base_url: None,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends every request to `base_url` instead of `https://{shop}`.
    ///
    /// Intended for tests against a local mock server and for egress
    /// proxies. The path `/admin/oauth/access_token` is still appended.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the token endpoint URL for `shop`.
    #[must_use]
    pub fn token_url(&self, shop: &ShopDomain) -> String {
        self.base_url.as_ref().map_or_else(
            || format!("https://{}/admin/oauth/access_token", shop.as_ref()),
            |base| format!("{base}/admin/oauth/access_token"),
        )
    }

    /// Exchanges an authorization `code` for an access token.
    ///
    /// Exactly one request is sent.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::TokenExchange`] with the HTTP status and an excerpt of
    ///   the body for any non-2xx response, or status `0` when the request
    ///   failed or timed out before a response arrived
    /// - [`OAuthError::TokenParse`] when a 2xx body is not a valid token
    ///   response
    pub async fn exchange(
        &self,
        config: &OAuthConfig,
        shop: &ShopDomain,
        code: &str,
    ) -> Result<AccessToken, OAuthError> {
        let url = self.token_url(shop);
        let body = AccessTokenRequest {
            client_id: config.api_key().as_ref(),
            client_secret: config.api_secret_key().as_ref(),
            code,
        };

        tracing::debug!(shop = %shop, "Exchanging authorization code");

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .timeout(self.timeout)
            .form(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(shop = %shop, error = %e, "Token request failed");
                OAuthError::TokenExchange {
                    status: 0,
                    message: format!("Network error: {e}"),
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| OAuthError::TokenExchange {
                status: status.as_u16(),
                message: format!("Failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            tracing::warn!(
                shop = %shop,
                status = status.as_u16(),
                "Token endpoint rejected authorization code"
            );
            return Err(OAuthError::TokenExchange {
                status: status.as_u16(),
                message: excerpt(&text),
            });
        }

        parse_token_response(shop, &text)
    }
}

impl Default for TokenExchangeClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a 2xx token endpoint body into an [`AccessToken`].
fn parse_token_response(shop: &ShopDomain, body: &str) -> Result<AccessToken, OAuthError> {
    let response: AccessTokenResponse =
        serde_json::from_str(body).map_err(|e| OAuthError::TokenParse {
            reason: e.to_string(),
        })?;

    if response.access_token.is_empty() {
        return Err(OAuthError::TokenParse {
            reason: "empty access_token".to_string(),
        });
    }

    AccessToken::from_response(shop.clone(), response, Utc::now()).map_err(|e| {
        OAuthError::TokenParse {
            reason: e.to_string(),
        }
    })
}

/// Truncates `body` to [`MAX_BODY_EXCERPT`] characters.
fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

// Verify TokenExchangeClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenExchangeClient>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_config() -> OAuthConfig {
        OAuthConfig::builder()
            .api_key(ApiKey::new("test-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
            .build()
            .unwrap()
    }

    fn shop() -> ShopDomain {
        ShopDomain::new("test-shop").unwrap()
    }

    #[test]
    fn test_token_url_defaults_to_shop() {
        let client = TokenExchangeClient::new();
        assert_eq!(
            client.token_url(&shop()),
            "https://test-shop.myshopify.com/admin/oauth/access_token"
        );
    }

    #[test]
    fn test_token_url_uses_base_url_override() {
        let client = TokenExchangeClient::new().with_base_url("http://127.0.0.1:9999/");
        assert_eq!(
            client.token_url(&shop()),
            "http://127.0.0.1:9999/admin/oauth/access_token"
        );
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(TokenExchangeClient::new().timeout(), Duration::from_secs(10));
        assert_eq!(
            TokenExchangeClient::new()
                .with_timeout(Duration::from_millis(250))
                .timeout(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_excerpt_caps_long_bodies() {
        let long = "x".repeat(2_000);
        let cut = excerpt(&long);

        assert_eq!(cut.chars().count(), MAX_BODY_EXCERPT + 1);
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_parse_rejects_missing_access_token() {
        let result = parse_token_response(&shop(), r#"{"scope":"read_products"}"#);
        assert!(matches!(result, Err(OAuthError::TokenParse { .. })));

        let result = parse_token_response(&shop(), r#"{"access_token":"","scope":"read_products"}"#);
        assert!(matches!(result, Err(OAuthError::TokenParse { .. })));
    }

    #[tokio::test]
    async fn test_exchange_sends_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("client_id=test-api-key"))
            .and(body_string_contains("client_secret=test-secret"))
            .and(body_string_contains("code=the-code"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"access_token":"tok","scope":"read_products"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = TokenExchangeClient::new().with_base_url(server.uri());
        let token = client
            .exchange(&create_test_config(), &shop(), "the-code")
            .await
            .unwrap();

        assert_eq!(token.access_token, "tok");
        assert!(!token.is_online());
    }

    #[tokio::test]
    async fn test_exchange_times_out_with_status_zero() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_string(r#"{"access_token":"tok","scope":"read_products"}"#),
            )
            .mount(&server)
            .await;

        let client = TokenExchangeClient::new()
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(100));
        let result = client.exchange(&create_test_config(), &shop(), "code").await;

        assert!(matches!(
            result,
            Err(OAuthError::TokenExchange { status: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_exchange_malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = TokenExchangeClient::new().with_base_url(server.uri());
        let result = client.exchange(&create_test_config(), &shop(), "code").await;

        assert!(matches!(result, Err(OAuthError::TokenParse { .. })));
    }
}
