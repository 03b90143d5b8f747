//! Access tokens returned by the authorization code exchange.
//!
//! [`AccessTokenResponse`] is the raw JSON body of the token endpoint.
//! [`AccessToken`] is the validated value handed to a
//! [`TokenSink`](crate::auth::oauth::TokenSink).

use crate::auth::{AssociatedUser, AuthScopes};
use crate::config::ShopDomain;
use crate::error::ConfigError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw body of a successful `POST /admin/oauth/access_token`.
///
/// Offline responses carry only `access_token` and `scope`. Online
/// responses add `expires_in`, `associated_user_scope` and `associated_user`.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessTokenResponse {
    /// The token value.
    pub access_token: String,
    /// Comma-separated granted scopes.
    pub scope: String,
    /// Seconds until an online token expires.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Comma-separated scopes the associated user actually holds.
    #[serde(default)]
    pub associated_user_scope: Option<String>,
    /// The user who approved an online-mode install.
    #[serde(default)]
    pub associated_user: Option<AssociatedUser>,
}

/// An access token for one shop.
///
/// The token value is a secret: the `Debug` implementation prints only its
/// length, and the crate never logs it.
///
/// ```rust
/// use shopify_oauth::{AccessToken, ShopDomain};
///
/// let token = AccessToken::offline(
///     ShopDomain::new("my-store").unwrap(),
///     "shpat_1234".to_string(),
///     "read_products".parse().unwrap(),
/// );
///
/// assert!(!token.is_online());
/// assert!(!format!("{token:?}").contains("shpat_1234"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    /// The shop this token grants access to.
    pub shop: ShopDomain,

    /// The token value.
    pub access_token: String,

    /// The scopes granted to the app.
    pub scopes: AuthScopes,

    /// When an online token stops working.
    pub expires: Option<DateTime<Utc>>,

    /// The scopes of the associated user, for online tokens.
    pub associated_user_scopes: Option<AuthScopes>,

    /// The approving user, for online tokens.
    pub associated_user: Option<AssociatedUser>,
}

impl AccessToken {
    /// Creates an offline token.
    #[must_use]
    pub const fn offline(shop: ShopDomain, access_token: String, scopes: AuthScopes) -> Self {
        Self {
            shop,
            access_token,
            scopes,
            expires: None,
            associated_user_scopes: None,
            associated_user: None,
        }
    }

    /// Builds a token from a token endpoint response.
    ///
    /// `issued_at` anchors the `expires_in` hint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidScopes`] when either scope string
    /// contains invalid characters, or [`ConfigError::InvalidTokenExpiry`]
    /// when `expires_in` does not fit in a timestamp.
    pub fn from_response(
        shop: ShopDomain,
        response: AccessTokenResponse,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        let scopes: AuthScopes = response.scope.parse()?;
        let associated_user_scopes = response
            .associated_user_scope
            .as_deref()
            .map(str::parse::<AuthScopes>)
            .transpose()?;
        let expires = response
            .expires_in
            .map(|secs| {
                i64::try_from(secs)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .and_then(|ttl| issued_at.checked_add_signed(ttl))
                    .ok_or(ConfigError::InvalidTokenExpiry { expires_in: secs })
            })
            .transpose()?;

        Ok(Self {
            shop,
            access_token: response.access_token,
            scopes,
            expires,
            associated_user_scopes,
            associated_user: response.associated_user,
        })
    }

    /// Returns `true` for an online-mode token, i.e. one bound to a user.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.associated_user.is_some()
    }

    /// Returns `true` once an expiring token is past its expiry.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires.is_some_and(|expires| Utc::now() > expires)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("shop", &self.shop)
            .field("access_token", &format_args!("<{} bytes>", self.access_token.len()))
            .field("scopes", &self.scopes)
            .field("expires", &self.expires)
            .field("associated_user_scopes", &self.associated_user_scopes)
            .field("associated_user", &self.associated_user)
            .finish()
    }
}

// Verify AccessToken is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AccessToken>();
};
