//! Destinations for freshly obtained access tokens.
//!
//! The flow hands every token it obtains to exactly one [`TokenSink`].
//! Persisting it (database, secrets manager, keychain) is the sink's job;
//! this crate never stores tokens itself.

use crate::auth::oauth::SinkError;
use crate::auth::AccessToken;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Receives each access token exactly once.
///
/// Returning an error fails the callback with
/// [`OAuthError::Sink`](crate::OAuthError::Sink). The token is not retried.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use shopify_oauth::{AccessToken, TokenSink};
/// use shopify_oauth::auth::oauth::SinkError;
///
/// struct Database;
///
/// #[async_trait]
/// impl TokenSink for Database {
///     async fn accept(&self, token: &AccessToken) -> Result<(), SinkError> {
///         // INSERT INTO shops (domain, token) VALUES (...)
///         let _ = (&token.shop, &token.access_token);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait TokenSink: Send + Sync {
    /// Takes ownership of the token's persistence.
    async fn accept(&self, token: &AccessToken) -> Result<(), SinkError>;
}

#[async_trait]
impl<T: TokenSink + ?Sized> TokenSink for Arc<T> {
    async fn accept(&self, token: &AccessToken) -> Result<(), SinkError> {
        (**self).accept(token).await
    }
}

/// Sink that only logs receipt of a token. Never fails.
///
/// Useful while developing an app; the token value itself is not logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTokenSink;

#[async_trait]
impl TokenSink for LogTokenSink {
    async fn accept(&self, token: &AccessToken) -> Result<(), SinkError> {
        tracing::info!(
            shop = %token.shop,
            token_len = token.access_token.len(),
            online = token.is_online(),
            "Received access token"
        );
        Ok(())
    }
}

/// Adapts a synchronous closure into a [`TokenSink`].
///
/// ```rust
/// use shopify_oauth::{AccessToken, FnTokenSink};
///
/// let sink = FnTokenSink::new(|token: &AccessToken| {
///     println!("installed on {}", token.shop);
///     Ok(())
/// });
/// # let _ = sink;
/// ```
pub struct FnTokenSink<F> {
    f: F,
}

impl<F> FnTokenSink<F>
where
    F: Fn(&AccessToken) -> Result<(), SinkError> + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> TokenSink for FnTokenSink<F>
where
    F: Fn(&AccessToken) -> Result<(), SinkError> + Send + Sync,
{
    async fn accept(&self, token: &AccessToken) -> Result<(), SinkError> {
        (self.f)(token)
    }
}

impl<F> fmt::Debug for FnTokenSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTokenSink").finish_non_exhaustive()
    }
}
