//! OAuth 2.0 authorization code flow for Shopify apps.
//!
//! An install has two legs:
//!
//! 1. **Authorization** ([`begin_auth`]): validate the shop, issue a fresh
//!    [`StateParam`], record it in the [`StateStore`] and redirect the
//!    browser to the shop's consent screen.
//!
//! 2. **Callback** ([`validate_auth_callback`], then
//!    [`TokenExchangeClient::exchange`]): when Shopify redirects back,
//!    verify the shop, the HMAC signature and the nonce, exchange the code
//!    for an access token and hand it to a [`TokenSink`].
//!
//! [`OAuthFlow`] wires both legs together for a web handler.
//!
//! # Security Features
//!
//! - **HMAC Validation**: Callbacks are verified with HMAC-SHA256 over the
//!   sorted query parameters
//! - **CSRF Protection**: Each nonce is bound to one shop and can be used
//!   once; two concurrent callbacks cannot both consume it
//! - **Constant-Time Comparison**: Signatures and nonces are compared in
//!   constant time
//! - **Key Rotation Support**: An old API secret key can be configured so
//!   in-flight installs survive a rotation
//! - **Uniform Rejection**: [`OAuthError::public_message`] is the same for
//!   every rejected callback
//!
//! # Online vs Offline Access Tokens
//!
//! - **Offline** (the default): app-level, does not expire, no user
//!   information. Use for background work and webhooks.
//! - **Online** ([`AccessMode::Online`](crate::AccessMode::Online), sent as
//!   `grant_options[]=per-user`): bound to the approving user, expires,
//!   carries an [`AssociatedUser`](crate::AssociatedUser).

mod auth_query;
mod begin_auth;
mod error;
mod flow;
pub mod hmac;
mod sink;
mod state;
mod state_store;
mod token_request;
mod validate_callback;

pub use auth_query::AuthQuery;
pub use begin_auth::{begin_auth, BeginAuthResult};
pub use error::{OAuthError, SinkError};
pub use flow::{CallbackOutcome, OAuthFlow};
pub use hmac::{compute_signature, constant_time_compare, validate_hmac};
pub use sink::{FnTokenSink, LogTokenSink, TokenSink};
pub use state::StateParam;
pub use state_store::{PendingState, StateStore};
pub use token_request::{TokenExchangeClient, DEFAULT_TOKEN_TIMEOUT};
pub use validate_callback::{validate_auth_callback, ValidatedCallback};
