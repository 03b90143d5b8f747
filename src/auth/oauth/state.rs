//! The OAuth `state` nonce.
//!
//! A [`StateParam`] binds an authorization request to its callback. It is
//! generated from the operating system's CSPRNG, carries 256 bits of entropy,
//! and is encoded as unpadded URL-safe base64 so it can be placed in a query
//! string without escaping.
//!
//! ```rust
//! use shopify_oauth::StateParam;
//!
//! let state = StateParam::new();
//! assert_eq!(state.as_ref().len(), 43);
//! assert_ne!(state, StateParam::new());
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// A single-use OAuth state nonce.
#[derive(Clone, PartialEq, Eq)]
pub struct StateParam(String);

impl StateParam {
    /// Number of random bytes behind each nonce.
    pub const NONCE_BYTES: usize = 32;

    /// Generates a fresh nonce from the OS random number generator.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; Self::NONCE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wraps an existing value, e.g. one read back from a shared store.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Only a prefix: the full value is a live CSRF token until consumed.
impl fmt::Debug for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "StateParam({prefix}…)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_encodes_32_bytes_url_safe() {
        let state = StateParam::new();

        assert_eq!(state.as_ref().len(), 43);
        assert!(state
            .as_ref()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(URL_SAFE_NO_PAD.decode(state.as_ref()).unwrap().len(), 32);
    }

    #[test]
    fn test_new_generates_unique_values() {
        let values: HashSet<String> = (0..100).map(|_| StateParam::new().to_string()).collect();
        assert_eq!(values.len(), 100);
    }

    #[test]
    fn test_from_raw_wraps_value() {
        let state = StateParam::from_raw("custom-state");
        assert_eq!(state.as_ref(), "custom-state");
        assert_eq!(state.to_string(), "custom-state");
    }

    #[test]
    fn test_debug_shows_only_prefix() {
        let state = StateParam::from_raw("abcdefghijkl");
        let debug = format!("{state:?}");

        assert!(debug.starts_with("StateParam(abcd"));
        assert!(!debug.contains("efgh"));
    }
}
