//! OAuth flow error types.
//!
//! # Error Types
//!
//! - [`OAuthError::RedirectBuild`]: The authorization URL could not be built
//! - [`OAuthError::InvalidShop`]: The shop parameter is not a canonical shop domain
//! - [`OAuthError::SignatureMismatch`]: HMAC signature validation failed
//! - [`OAuthError::StateMismatch`]: No pending nonce for the shop, or a different one
//! - [`OAuthError::InvalidCallback`]: A required callback parameter is missing
//! - [`OAuthError::TokenExchange`]: The token endpoint failed or returned non-2xx
//! - [`OAuthError::TokenParse`]: The token endpoint returned an unusable body
//! - [`OAuthError::Sink`]: The token sink rejected a freshly obtained token
//!
//! # Uniform Rejection
//!
//! The four validation errors carry their detailed cause in `Display` for
//! server-side logs, but must be reported to the caller identically.
//! Use [`OAuthError::public_message`] and [`OAuthError::http_status`] when
//! building a response:
//!
//! ```rust
//! use shopify_oauth::OAuthError;
//!
//! let signature = OAuthError::SignatureMismatch;
//! let state = OAuthError::StateMismatch { shop: "a.myshopify.com".to_string() };
//!
//! assert_eq!(signature.public_message(), state.public_message());
//! assert_eq!(signature.http_status(), 400);
//! assert_ne!(signature.to_string(), state.to_string());
//! ```

use thiserror::Error;

/// Boxed error returned by a [`TokenSink`](crate::auth::oauth::TokenSink).
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during the OAuth authorization code flow.
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async boundaries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The authorization URL could not be built from the configuration and
    /// the inbound start request.
    #[error("Cannot build authorization redirect: {reason}")]
    RedirectBuild {
        /// What was missing or invalid.
        reason: String,
    },

    /// The `shop` parameter is not a canonical `*.myshopify.com` domain.
    #[error("Invalid shop domain: '{shop}'")]
    InvalidShop {
        /// The rejected value.
        shop: String,
    },

    /// The `hmac` parameter does not match the signature recomputed with the
    /// API secret key.
    #[error("HMAC signature validation failed")]
    SignatureMismatch,

    /// The `state` parameter does not match the pending nonce for the shop,
    /// or the shop has no pending authorization.
    #[error("OAuth state does not match a pending authorization for shop '{shop}'")]
    StateMismatch {
        /// The shop the callback claimed to be for.
        shop: String,
    },

    /// A required callback parameter is missing or empty.
    #[error("Invalid callback: {reason}")]
    InvalidCallback {
        /// Description of what's invalid about the callback.
        reason: String,
    },

    /// The token exchange request failed.
    ///
    /// `status` is the HTTP status of the response, or `0` when no response
    /// was received (connection failure or timeout).
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchange {
        /// The HTTP status code returned, `0` for transport failures.
        status: u16,
        /// Excerpt of the response body, or the transport error.
        message: String,
    },

    /// The token endpoint answered 2xx with a body that is not a valid token.
    #[error("Failed to parse token response: {reason}")]
    TokenParse {
        /// The parse failure.
        reason: String,
    },

    /// The token sink refused the token.
    ///
    /// The exchange itself succeeded; the caller decides whether to discard
    /// the token or retry delivery.
    #[error("Token sink rejected access token for shop '{shop}': {source}")]
    Sink {
        /// The shop the token belongs to.
        shop: String,
        /// The sink's error.
        #[source]
        source: SinkError,
    },
}

impl OAuthError {
    /// Message shared by every rejected callback.
    pub const REJECTED_CALLBACK: &'static str = "invalid OAuth callback";

    /// Returns `true` for errors caused by the inbound request rather than
    /// by this server or the platform.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::RedirectBuild { .. }
                | Self::InvalidShop { .. }
                | Self::SignatureMismatch
                | Self::StateMismatch { .. }
                | Self::InvalidCallback { .. }
        )
    }

    /// Returns `true` for errors that indicate a forged, replayed or expired
    /// callback.
    #[must_use]
    pub const fn is_rejected_callback(&self) -> bool {
        matches!(
            self,
            Self::InvalidShop { .. }
                | Self::SignatureMismatch
                | Self::StateMismatch { .. }
                | Self::InvalidCallback { .. }
        )
    }

    /// The HTTP status a handler should respond with.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::TokenExchange { .. } | Self::TokenParse { .. } => 502,
            Self::Sink { .. } => 500,
            _ => 400,
        }
    }

    /// A message that is safe to show to the caller.
    ///
    /// Rejected callbacks all map to [`Self::REJECTED_CALLBACK`] so a forger
    /// cannot learn which check failed.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::RedirectBuild { .. } => "cannot start OAuth authorization",
            Self::InvalidShop { .. }
            | Self::SignatureMismatch
            | Self::StateMismatch { .. }
            | Self::InvalidCallback { .. } => Self::REJECTED_CALLBACK,
            Self::TokenExchange { .. } | Self::TokenParse { .. } => {
                "failed to obtain access token"
            }
            Self::Sink { .. } => "failed to store access token",
        }
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
