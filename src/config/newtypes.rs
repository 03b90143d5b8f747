//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Shopify API key (the OAuth `client_id`).
///
/// # Example
///
/// ```rust
/// use shopify_oauth::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Shopify API secret key (the OAuth `client_secret`).
///
/// The secret keys every callback signature and is sent to the token
/// endpoint. Its `Debug` output is masked so it never ends up in logs.
///
/// ```rust
/// use shopify_oauth::ApiSecretKey;
///
/// let secret = ApiSecretKey::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiSecretKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecretKey(String);

impl ApiSecretKey {
    /// Creates a new validated API secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiSecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiSecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiSecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecretKey(*****)")
    }
}

/// A validated Shopify shop domain.
///
/// There are two constructors with different strictness:
///
/// - [`ShopDomain::new`] is for trusted input such as configuration and tests.
///   It trims, lowercases and expands `shop-name` to `shop-name.myshopify.com`.
/// - [`ShopDomain::parse_canonical`] is for values that arrive on an inbound
///   request. It accepts only the exact canonical form and never normalizes,
///   so the domain that was signed is the domain that gets used.
///
/// ```rust
/// use shopify_oauth::ShopDomain;
///
/// let domain = ShopDomain::new("My-Store").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
/// assert_eq!(domain.shop_name(), "my-store");
///
/// assert!(ShopDomain::parse_canonical("my-store.myshopify.com").is_ok());
/// assert!(ShopDomain::parse_canonical("My-Store.myshopify.com").is_err());
/// assert!(ShopDomain::parse_canonical("my-store").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShopDomain {
    full_domain: String,
    shop_name_end: usize,
}

impl ShopDomain {
    /// The fixed platform suffix of every shop domain.
    pub const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a validated shop domain, normalizing case and the short form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into().trim().to_lowercase();

        if domain.contains('.') {
            return Self::parse_canonical(domain);
        }

        Self::parse_canonical(format!("{domain}{}", Self::SUFFIX))
    }

    /// Parses a shop domain that must already be in canonical form:
    /// a lowercase alphanumeric/hyphen label followed by `.myshopify.com`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] for anything else, including
    /// uppercase letters, surrounding whitespace and the short form.
    pub fn parse_canonical(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into();

        let Some(shop_name) = domain.strip_suffix(Self::SUFFIX) else {
            return Err(ConfigError::InvalidShopDomain { domain });
        };

        if !Self::is_valid_shop_name(shop_name) {
            return Err(ConfigError::InvalidShopDomain { domain });
        }

        Ok(Self {
            shop_name_end: shop_name.len(),
            full_domain: domain,
        })
    }

    /// Returns the shop name portion of the domain.
    ///
    /// For `my-store.myshopify.com`, this returns `my-store`.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.full_domain[..self.shop_name_end]
    }

    fn is_valid_shop_name(name: &str) -> bool {
        if name.is_empty() || name.starts_with('-') || name.ends_with('-') {
            return false;
        }

        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.full_domain
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_domain)
    }
}

impl Serialize for ShopDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.full_domain)
    }
}

impl<'de> Deserialize<'de> for ShopDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// The application's own public base URL (`SERVICE_URL`).
///
/// The OAuth `redirect_uri` is this URL joined with the callback path.
/// A trailing slash is dropped so the join never produces `//`.
///
/// ```rust
/// use shopify_oauth::HostUrl;
///
/// let url = HostUrl::new("https://myapp.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://myapp.example.com");
/// assert_eq!(url.host_name(), Some("myapp.example.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    url: String,
    scheme: String,
    host: String,
}

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL does not parse or
    /// has no host (e.g. `mailto:` or `file:` URLs).
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let parsed = match url::Url::parse(&url) {
            Ok(parsed) => parsed,
            Err(_) => return Err(ConfigError::InvalidHostUrl { url }),
        };
        let Some(host) = parsed.host_str().filter(|host| !host.is_empty()) else {
            return Err(ConfigError::InvalidHostUrl { url });
        };

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host: host.to_string(),
            url,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        Some(self.host.as_str())
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}
