//! Authentication types and the OAuth authorization code flow.
//!
//! # Overview
//!
//! - [`AuthScopes`]: A set of OAuth scopes
//! - [`AccessToken`]: The result of a successful code exchange
//! - [`AssociatedUser`]: The approving admin user of an online-mode token
//! - [`oauth`]: Nonce issuance, callback validation and token exchange
//!
//! # Access Modes
//!
//! - **Offline tokens**: App-level tokens that do not expire. Used for
//!   background work and webhooks.
//! - **Online tokens**: Bound to the admin user who approved the install,
//!   expire, and carry an [`AssociatedUser`].

mod access_token;
mod associated_user;
pub mod oauth;
mod scopes;

pub use access_token::{AccessToken, AccessTokenResponse};
pub use associated_user::AssociatedUser;
pub use scopes::AuthScopes;
