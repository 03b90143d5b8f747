//! # Shopify OAuth
//!
//! The server side of the Shopify OAuth authorization code flow: issuing
//! single-use nonces, building the consent URL, validating the signed
//! callback and exchanging the authorization code for an access token.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`OAuthConfig`] and [`OAuthConfigBuilder`],
//!   or from the environment with [`OAuthConfig::from_env`]
//! - Validated newtypes for API credentials and shop domains
//! - OAuth scope sets, parsed and rendered in Shopify's comma-separated form
//! - A concurrent per-shop nonce store, [`StateStore`]
//! - Callback validation (shop, HMAC-SHA256 signature, nonce)
//! - The code-for-token exchange via [`TokenExchangeClient`]
//! - A pluggable [`TokenSink`] that receives each new token
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_oauth::{AccessMode, ApiKey, ApiSecretKey, HostUrl, OAuthConfig};
//!
//! let config = OAuthConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-api-secret").unwrap())
//!     .host(HostUrl::new("https://your-app.com").unwrap())
//!     .scopes("read_products,write_orders".parse().unwrap())
//!     .access_mode(AccessMode::Offline)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.redirect_uri().as_deref(),
//!     Some("https://your-app.com/oauth/redirect")
//! );
//! ```
//!
//! ## Installing an App
//!
//! ```rust
//! use shopify_oauth::{
//!     ApiKey, ApiSecretKey, AuthQuery, HostUrl, LogTokenSink, OAuthConfig, OAuthFlow,
//!     StateStore,
//! };
//!
//! let config = OAuthConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-secret").unwrap())
//!     .host(HostUrl::new("https://your-app.com").unwrap())
//!     .scopes("read_products".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let flow = OAuthFlow::new(config, StateStore::new(), LogTokenSink);
//!
//! // Install route: redirect the browser to the consent screen
//! let begin = flow.begin(&AuthQuery::parse("shop=example-shop.myshopify.com")).unwrap();
//! assert!(begin.auth_url.contains("state="));
//!
//! // Redirect route, once Shopify sends the browser back:
//! // let outcome = flow.complete(&AuthQuery::parse(callback_query)).await?;
//! // redirect to outcome.redirect_url
//! ```
//!
//! ## Reporting Failures
//!
//! Every rejected callback yields the same [`OAuthError::public_message`]
//! and [`OAuthError::http_status`]; the `Display` form carries the detail for
//! server logs only.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Token values and secrets are never logged.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod auth;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::{AccessToken, AccessTokenResponse, AssociatedUser, AuthScopes};
pub use config::{
    AccessMode, ApiKey, ApiSecretKey, HostUrl, OAuthConfig, OAuthConfigBuilder, ShopDomain,
};
pub use error::ConfigError;

// Re-export OAuth types for convenience
pub use auth::oauth::{
    begin_auth, validate_auth_callback, AuthQuery, BeginAuthResult, CallbackOutcome,
    FnTokenSink, LogTokenSink, OAuthError, OAuthFlow, StateParam, StateStore,
    TokenExchangeClient, TokenSink, ValidatedCallback,
};
