//! OAuth authorization URL generation.
//!
//! [`begin_auth`] is the first step of the authorization code flow. Given the
//! query of the "start install" request it:
//!
//! 1. Validates the shop domain (and the request signature, when Shopify
//!    sent one)
//! 2. Issues a fresh [`StateParam`] and records it in the [`StateStore`]
//! 3. Builds the consent screen URL the browser is redirected to
//!
//! # Example
//!
//! ```rust
//! use shopify_oauth::{ApiKey, ApiSecretKey, AuthQuery, HostUrl, OAuthConfig, StateStore};
//! use shopify_oauth::auth::oauth::begin_auth;
//!
//! let config = OAuthConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-secret").unwrap())
//!     .host(HostUrl::new("https://your-app.com").unwrap())
//!     .scopes("read_products,write_orders".parse().unwrap())
//!     .build()
//!     .unwrap();
//! let store = StateStore::new();
//!
//! let query = AuthQuery::parse("shop=example-shop.myshopify.com");
//! let result = begin_auth(&config, &store, &query).unwrap();
//!
//! assert!(result.auth_url.starts_with("https://example-shop.myshopify.com/admin/oauth/authorize?"));
//! assert_eq!(store.peek(&result.shop).unwrap().nonce, result.state);
//! ```

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::hmac::validate_hmac;
use crate::auth::oauth::state::StateParam;
use crate::auth::oauth::state_store::StateStore;
use crate::auth::oauth::AuthQuery;
use crate::config::{OAuthConfig, ShopDomain};

/// Result of initiating OAuth authorization.
#[derive(Clone, Debug)]
pub struct BeginAuthResult {
    /// The full authorization URL to redirect the browser to.
    pub auth_url: String,

    /// The validated shop being installed.
    pub shop: ShopDomain,

    /// The nonce placed in the URL and recorded in the store.
    pub state: StateParam,
}

/// Builds the authorization URL for the shop named in `query`.
///
/// The query is the raw query of the request that starts the install. Its
/// `shop` must be a canonical shop domain. When it also carries an `hmac`
/// (Shopify signs installs launched from the admin), the signature is
/// verified exactly like a callback's.
///
/// The authorize URL carries `client_id`, `scope` (comma-joined),
/// `redirect_uri`, `state`, and `grant_options[]=per-user` in online mode.
///
/// # Errors
///
/// - [`OAuthError::RedirectBuild`] if the host URL or scopes are not
///   configured, or the shop domain is missing or invalid
/// - [`OAuthError::SignatureMismatch`] if an included `hmac` is wrong
///
/// Nothing is written to the store on error.
pub fn begin_auth(
    config: &OAuthConfig,
    store: &StateStore,
    query: &AuthQuery,
) -> Result<BeginAuthResult, OAuthError> {
    let redirect_uri = config
        .redirect_uri()
        .ok_or_else(|| OAuthError::RedirectBuild {
            reason: "host URL is not configured".to_string(),
        })?;

    if config.scopes().is_empty() {
        return Err(OAuthError::RedirectBuild {
            reason: "no OAuth scopes are configured".to_string(),
        });
    }

    let raw_shop = query.shop().unwrap_or_default();
    let shop = ShopDomain::parse_canonical(raw_shop).map_err(|_| OAuthError::RedirectBuild {
        reason: format!("invalid shop domain '{raw_shop}'"),
    })?;

    if query.hmac().is_some() && !validate_hmac(query, config) {
        tracing::warn!(shop = %shop, "Rejected install request with invalid HMAC");
        return Err(OAuthError::SignatureMismatch);
    }

    let state = StateParam::new();

    let mut params = vec![
        ("client_id", config.api_key().as_ref().to_string()),
        ("scope", config.scopes().to_string()),
        ("redirect_uri", redirect_uri),
        ("state", state.to_string()),
    ];
    if let Some(grant) = config.access_mode().grant_options() {
        params.push(("grant_options[]", grant.to_string()));
    }

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let auth_url = format!(
        "https://{}/admin/oauth/authorize?{}",
        shop.as_ref(),
        query_string
    );

    store.put(shop.clone(), state.clone());
    tracing::debug!(
        shop = %shop,
        access_mode = %config.access_mode(),
        "Issued OAuth authorization redirect"
    );

    Ok(BeginAuthResult {
        auth_url,
        shop,
        state,
    })
}

// Verify BeginAuthResult is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BeginAuthResult>();
};
