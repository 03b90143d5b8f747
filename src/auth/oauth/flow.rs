//! End-to-end coordination of the authorization code flow.
//!
//! [`OAuthFlow`] owns everything a web handler needs for both legs of an
//! install: the configuration, the shared [`StateStore`], a
//! [`TokenExchangeClient`] and a [`TokenSink`]. Handlers call
//! [`OAuthFlow::begin`] on the install route and [`OAuthFlow::complete`] on
//! the redirect route, and respond with a redirect to the returned URL.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_oauth::{AuthQuery, LogTokenSink, OAuthConfig, OAuthFlow, StateStore};
//!
//! let flow = OAuthFlow::new(OAuthConfig::from_env()?, StateStore::new(), LogTokenSink);
//!
//! // GET /oauth/install?shop=...
//! let begin = flow.begin(&AuthQuery::parse(install_query))?;
//! // 302 -> begin.auth_url
//!
//! // GET /oauth/redirect?code=...&hmac=...&shop=...&state=...&timestamp=...
//! match flow.complete(&AuthQuery::parse(callback_query)).await {
//!     Ok(outcome) => { /* 302 -> outcome.redirect_url */ }
//!     Err(e) => { /* e.http_status(), e.public_message() */ }
//! }
//! ```

use crate::auth::oauth::{
    begin_auth, validate_auth_callback, AuthQuery, BeginAuthResult, OAuthError, StateStore,
    TokenExchangeClient, TokenSink,
};
use crate::config::{OAuthConfig, ShopDomain};

/// Result of a completed install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackOutcome {
    /// The shop the app was installed on.
    pub shop: ShopDomain,
    /// Where to send the browser next.
    pub redirect_url: String,
}

/// Runs both legs of the authorization code flow for one app.
///
/// `OAuthFlow` is `Send + Sync` when its sink is, so a single instance can be
/// shared by every request handler behind an `Arc`.
#[derive(Debug)]
pub struct OAuthFlow<S> {
    config: OAuthConfig,
    store: StateStore,
    client: TokenExchangeClient,
    sink: S,
}

impl<S: TokenSink> OAuthFlow<S> {
    /// Creates a flow with a default [`TokenExchangeClient`].
    pub fn new(config: OAuthConfig, store: StateStore, sink: S) -> Self {
        Self {
            config,
            store,
            client: TokenExchangeClient::new(),
            sink,
        }
    }

    /// Replaces the token exchange client, e.g. to change its timeout.
    #[must_use]
    pub fn with_exchange_client(mut self, client: TokenExchangeClient) -> Self {
        self.client = client;
        self
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Returns the pending state store.
    pub const fn store(&self) -> &StateStore {
        &self.store
    }

    /// Returns the token sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Starts an install. See [`begin_auth`].
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::RedirectBuild`] or
    /// [`OAuthError::SignatureMismatch`].
    pub fn begin(&self, query: &AuthQuery) -> Result<BeginAuthResult, OAuthError> {
        begin_auth(&self.config, &self.store, query).map_err(|e| {
            tracing::warn!(
                app = ?self.config.app_name(),
                error = %e,
                "Refused to start OAuth authorization"
            );
            e
        })
    }

    /// Completes an install from the callback query.
    ///
    /// Validates the callback, exchanges the code, and hands the token to
    /// the sink. The sink runs at most once, and only after every check has
    /// passed and the exchange has succeeded.
    ///
    /// # Errors
    ///
    /// Any validation error from [`validate_auth_callback`], any exchange
    /// error from [`TokenExchangeClient::exchange`], or
    /// [`OAuthError::Sink`] when the sink refuses the token.
    pub async fn complete(&self, query: &AuthQuery) -> Result<CallbackOutcome, OAuthError> {
        let validated = validate_auth_callback(&self.config, &self.store, query).map_err(|e| {
            tracing::warn!(
                app = ?self.config.app_name(),
                error = %e,
                "Rejected OAuth callback"
            );
            e
        })?;

        let token = self
            .client
            .exchange(&self.config, &validated.shop, &validated.code)
            .await?;

        self.sink
            .accept(&token)
            .await
            .map_err(|source| OAuthError::Sink {
                shop: validated.shop.to_string(),
                source,
            })?;

        tracing::info!(
            app = ?self.config.app_name(),
            shop = %validated.shop,
            online = token.is_online(),
            "Completed OAuth install"
        );

        Ok(CallbackOutcome {
            redirect_url: self.config.landing_url(&validated.shop),
            shop: validated.shop,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::oauth::{FnTokenSink, LogTokenSink, SinkError};
    use crate::auth::AccessToken;
    use crate::config::{ApiKey, ApiSecretKey, HostUrl};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn create_test_config() -> OAuthConfig {
        OAuthConfig::builder()
            .api_key(ApiKey::new("test-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap())
            .scopes("read_products".parse().unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_begin_records_state_in_shared_store() {
        let store = StateStore::new();
        let flow = OAuthFlow::new(create_test_config(), store.clone(), LogTokenSink);

        let result = flow
            .begin(&AuthQuery::parse("shop=test-shop.myshopify.com"))
            .unwrap();

        assert_eq!(store.peek(&result.shop).unwrap().nonce, result.state);
    }

    #[tokio::test]
    async fn test_complete_rejects_unsigned_callback_without_calling_sink() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sink = FnTokenSink::new(move |_: &AccessToken| -> Result<(), SinkError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let flow = OAuthFlow::new(create_test_config(), StateStore::new(), sink);
        let begin = flow
            .begin(&AuthQuery::parse("shop=test-shop.myshopify.com"))
            .unwrap();

        let query = AuthQuery::parse(&format!(
            "code=c&shop=test-shop.myshopify.com&state={}",
            begin.state
        ));
        let err = flow.complete(&query).await.unwrap_err();

        assert!(matches!(err, OAuthError::SignatureMismatch));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejections_are_logged_with_app_name() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let config = OAuthConfig::builder()
            .app_name("Inventory Sync")
            .api_key(ApiKey::new("test-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap())
            .scopes("read_products".parse().unwrap())
            .build()
            .unwrap();
        let flow = OAuthFlow::new(config, StateStore::new(), LogTokenSink);

        assert!(flow.begin(&AuthQuery::parse("shop=evil.example.com")).is_err());
        assert!(flow
            .complete(&AuthQuery::parse("code=c&shop=test-shop.myshopify.com&state=s"))
            .await
            .is_err());

        let output = logs.contents();
        assert!(output.contains("Refused to start OAuth authorization"));
        assert!(output.contains("Rejected OAuth callback"));
        assert_eq!(output.matches("Inventory Sync").count(), 2);
    }

    #[test]
    fn test_flow_is_send_sync_with_send_sync_sink() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        let flow = OAuthFlow::new(create_test_config(), StateStore::new(), LogTokenSink);
        assert_send_sync(&flow);
    }
}
