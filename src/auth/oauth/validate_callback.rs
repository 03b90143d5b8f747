//! OAuth callback validation.
//!
//! After the merchant approves the app, Shopify redirects the browser to the
//! app's callback path with `shop`, `code`, `state`, `timestamp`, `hmac` and
//! usually `host`. [`validate_auth_callback`] turns that untrusted query into
//! a [`ValidatedCallback`], checking in order:
//!
//! 1. The shop is a canonical `*.myshopify.com` domain
//! 2. The HMAC signature matches
//! 3. The `state` equals the pending nonce for that shop, which is consumed
//!
//! Validation never awaits, so it either completes or has no effect.

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::hmac::validate_hmac;
use crate::auth::oauth::state_store::StateStore;
use crate::auth::oauth::AuthQuery;
use crate::config::{OAuthConfig, ShopDomain};

/// A callback whose shop, signature and nonce have been verified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedCallback {
    /// The shop that approved the install.
    pub shop: ShopDomain,
    /// The authorization code to exchange.
    pub code: String,
    /// The base64 admin host, for embedded apps.
    pub host: Option<String>,
    /// The signed request timestamp.
    pub timestamp: Option<String>,
}

/// Validates an OAuth callback query.
///
/// # Errors
///
/// - [`OAuthError::InvalidShop`]: `shop` is missing or not canonical
/// - [`OAuthError::SignatureMismatch`]: `hmac` is missing or wrong
/// - [`OAuthError::StateMismatch`]: no pending nonce for the shop, or a
///   different one
/// - [`OAuthError::InvalidCallback`]: `code` is missing or empty
///
/// The pending nonce is consumed as soon as the signature has been verified,
/// even when the nonce or a later step fails.
///
/// # Example
///
/// ```rust
/// use shopify_oauth::{ApiKey, ApiSecretKey, AuthQuery, OAuthConfig, OAuthError, StateStore};
/// use shopify_oauth::auth::oauth::validate_auth_callback;
///
/// let config = OAuthConfig::builder()
///     .api_key(ApiKey::new("key").unwrap())
///     .api_secret_key(ApiSecretKey::new("secret").unwrap())
///     .build()
///     .unwrap();
///
/// let query = AuthQuery::parse("shop=my-store.myshopify.com&code=c&state=s&hmac=00");
/// let result = validate_auth_callback(&config, &StateStore::new(), &query);
///
/// assert!(matches!(result, Err(OAuthError::SignatureMismatch)));
/// ```
pub fn validate_auth_callback(
    config: &OAuthConfig,
    store: &StateStore,
    query: &AuthQuery,
) -> Result<ValidatedCallback, OAuthError> {
    let raw_shop = query.shop().unwrap_or_default();
    let shop = ShopDomain::parse_canonical(raw_shop).map_err(|_| OAuthError::InvalidShop {
        shop: raw_shop.to_string(),
    })?;

    if !validate_hmac(query, config) {
        return Err(OAuthError::SignatureMismatch);
    }

    let state = query.state().unwrap_or_default();
    if !store.take_if_matches(&shop, state) {
        return Err(OAuthError::StateMismatch {
            shop: shop.to_string(),
        });
    }

    let code = query
        .code()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| OAuthError::InvalidCallback {
            reason: "missing authorization code".to_string(),
        })?;

    Ok(ValidatedCallback {
        shop,
        code: code.to_string(),
        host: query.host().map(str::to_string),
        timestamp: query.timestamp().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::oauth::hmac::compute_signature;
    use crate::auth::oauth::StateParam;
    use crate::config::{ApiKey, ApiSecretKey};

    const SECRET: &str = "test-secret";

    fn create_test_config() -> OAuthConfig {
        OAuthConfig::builder()
            .api_key(ApiKey::new("test-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new(SECRET).unwrap())
            .build()
            .unwrap()
    }

    fn signed(raw: &str, secret: &str) -> AuthQuery {
        let mut query = AuthQuery::parse(raw);
        let hmac = compute_signature(&query.to_signable_string(), secret);
        query.set("hmac", hmac);
        query
    }

    fn callback(shop: &str, state: &str) -> AuthQuery {
        signed(
            &format!("code=auth-code-123&host=dGVzdC1ob3N0&shop={shop}&state={state}&timestamp=1700000000"),
            SECRET,
        )
    }

    fn pending_store(shop: &str, nonce: &str) -> StateStore {
        let store = StateStore::new();
        store.put(ShopDomain::new(shop).unwrap(), StateParam::from_raw(nonce));
        store
    }

    #[test]
    fn test_valid_callback_is_accepted() {
        let store = pending_store("test-shop", "nonce");

        let validated = validate_auth_callback(
            &create_test_config(),
            &store,
            &callback("test-shop.myshopify.com", "nonce"),
        )
        .unwrap();

        assert_eq!(validated.shop.as_ref(), "test-shop.myshopify.com");
        assert_eq!(validated.code, "auth-code-123");
        assert_eq!(validated.host.as_deref(), Some("dGVzdC1ob3N0"));
        assert_eq!(validated.timestamp.as_deref(), Some("1700000000"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_shop_is_rejected_before_signature() {
        let store = pending_store("test-shop", "nonce");

        let result = validate_auth_callback(
            &create_test_config(),
            &store,
            &callback("test-shop.evil.com", "nonce"),
        );

        assert!(matches!(result, Err(OAuthError::InvalidShop { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_bad_signature_fails_even_with_matching_nonce() {
        let store = pending_store("test-shop", "nonce");
        let query = signed(
            "code=auth-code-123&shop=test-shop.myshopify.com&state=nonce&timestamp=1700000000",
            "wrong-secret",
        );

        let result = validate_auth_callback(&create_test_config(), &store, &query);

        assert!(matches!(result, Err(OAuthError::SignatureMismatch)));
    }

    #[test]
    fn test_missing_hmac_is_signature_mismatch() {
        let store = pending_store("test-shop", "nonce");
        let query = AuthQuery::parse("code=c&shop=test-shop.myshopify.com&state=nonce");

        let result = validate_auth_callback(&create_test_config(), &store, &query);

        assert!(matches!(result, Err(OAuthError::SignatureMismatch)));
    }

    #[test]
    fn test_nonce_from_another_shop_is_rejected() {
        let store = pending_store("shop-a", "nonce-a");
        store.put(ShopDomain::new("shop-b").unwrap(), StateParam::from_raw("nonce-b"));

        let result = validate_auth_callback(
            &create_test_config(),
            &store,
            &callback("shop-b.myshopify.com", "nonce-a"),
        );

        assert!(matches!(result, Err(OAuthError::StateMismatch { .. })));
    }

    #[test]
    fn test_unknown_shop_and_wrong_nonce_fail_identically() {
        let config = create_test_config();
        let store = pending_store("test-shop", "nonce");

        let unknown =
            validate_auth_callback(&config, &store, &callback("other-shop.myshopify.com", "nonce"))
                .unwrap_err();
        let wrong =
            validate_auth_callback(&config, &store, &callback("test-shop.myshopify.com", "guess"))
                .unwrap_err();

        assert!(matches!(unknown, OAuthError::StateMismatch { .. }));
        assert!(matches!(wrong, OAuthError::StateMismatch { .. }));
        assert_eq!(unknown.public_message(), wrong.public_message());
    }

    #[test]
    fn test_replayed_callback_is_rejected() {
        let config = create_test_config();
        let store = pending_store("test-shop", "nonce");
        let query = callback("test-shop.myshopify.com", "nonce");

        assert!(validate_auth_callback(&config, &store, &query).is_ok());
        assert!(matches!(
            validate_auth_callback(&config, &store, &query),
            Err(OAuthError::StateMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_code_is_rejected_after_consuming_nonce() {
        let store = pending_store("test-shop", "nonce");
        let query = signed(
            "shop=test-shop.myshopify.com&state=nonce&timestamp=1700000000",
            SECRET,
        );

        let result = validate_auth_callback(&create_test_config(), &store, &query);

        assert!(matches!(result, Err(OAuthError::InvalidCallback { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_old_secret_is_accepted_during_rotation() {
        let config = OAuthConfig::builder()
            .api_key(ApiKey::new("test-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new("new-secret").unwrap())
            .old_api_secret_key(ApiSecretKey::new(SECRET).unwrap())
            .build()
            .unwrap();
        let store = pending_store("test-shop", "nonce");

        let result =
            validate_auth_callback(&config, &store, &callback("test-shop.myshopify.com", "nonce"));

        assert!(result.is_ok());
    }
}
