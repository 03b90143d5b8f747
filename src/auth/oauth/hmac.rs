//! HMAC validation for Shopify OAuth requests.
//!
//! Shopify signs the query string of both the install request and the OAuth
//! callback with HMAC-SHA256, keyed by the app's API secret key and
//! hex-encoded. See [`AuthQuery::to_signable_string`] for the exact message.
//!
//! # Security
//!
//! All comparisons use constant-time comparison to prevent timing attacks.
//! Validation falls back to the old secret key, if configured, to support key
//! rotation.
//!
//! # Example
//!
//! ```rust
//! use shopify_oauth::auth::oauth::hmac::compute_signature;
//!
//! let message = "code=abc123&shop=example.myshopify.com&state=xyz";
//! let signature = compute_signature(message, "my-api-secret");
//! assert_eq!(signature.len(), 64);
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::auth::oauth::AuthQuery;
use crate::config::OAuthConfig;

type HmacSha256 = Hmac<Sha256>;

/// Computes a lowercase hex HMAC-SHA256 signature of `message`.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Performs constant-time comparison of two strings.
///
/// Strings of different lengths compare unequal without an early exit on
/// content.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Validates the `hmac` parameter of an inbound OAuth request.
///
/// Returns `false` when the parameter is missing or empty. The primary secret
/// is tried first, then `old_api_secret_key` if configured.
#[must_use]
pub fn validate_hmac(query: &AuthQuery, config: &OAuthConfig) -> bool {
    let Some(received) = query.hmac().filter(|hmac| !hmac.is_empty()) else {
        return false;
    };
    let received = received.to_ascii_lowercase();
    let signable = query.to_signable_string();

    let computed = compute_signature(&signable, config.api_secret_key().as_ref());
    if constant_time_compare(&computed, &received) {
        return true;
    }

    config.old_api_secret_key().is_some_and(|old_secret| {
        let computed_old = compute_signature(&signable, old_secret.as_ref());
        constant_time_compare(&computed_old, &received)
    })
}
