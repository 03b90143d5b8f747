//! Application configuration for the OAuth flow.
//!
//! # Overview
//!
//! - [`OAuthConfig`]: The static identity of the app (client id, secret,
//!   requested scopes, access mode, own callback URL)
//! - [`OAuthConfigBuilder`]: A builder for constructing [`OAuthConfig`] instances
//! - [`AccessMode`]: Online (per-user) or offline access tokens
//! - [`ApiKey`], [`ApiSecretKey`], [`ShopDomain`], [`HostUrl`]: validated newtypes
//!
//! # Example
//!
//! ```rust
//! use shopify_oauth::{OAuthConfig, ApiKey, ApiSecretKey, HostUrl};
//!
//! let config = OAuthConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .host(HostUrl::new("https://myapp.example.com").unwrap())
//!     .scopes("read_products".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.redirect_uri().unwrap(), "https://myapp.example.com/oauth/redirect");
//! ```

mod newtypes;

pub use newtypes::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};

use crate::auth::AuthScopes;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Default path of the OAuth callback endpoint on the app.
pub const DEFAULT_REDIRECT_PATH: &str = "/oauth/redirect";

/// Default post-install destination. `{shop}` is replaced with the shop domain.
pub const DEFAULT_LANDING_URL: &str = "https://{shop}/admin/apps";

/// Which kind of access token the app asks for.
///
/// Offline tokens are app-level and long-lived. Online tokens are bound to
/// the admin user who approved the install and carry that user's identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessMode {
    /// App-level token, no `grant_options[]` sent.
    #[default]
    Offline,
    /// Per-user token, sends `grant_options[]=per-user`.
    Online,
}

impl AccessMode {
    /// Returns the `grant_options[]` value for the authorize URL, if any.
    #[must_use]
    pub const fn grant_options(self) -> Option<&'static str> {
        match self {
            Self::Offline => None,
            Self::Online => Some("per-user"),
        }
    }
}

impl FromStr for AccessMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "offline" => Ok(Self::Offline),
            "per-user" | "online" => Ok(Self::Online),
            other => Err(ConfigError::InvalidGrantOptions {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => f.write_str("offline"),
            Self::Online => f.write_str("online"),
        }
    }
}

/// Static per-application OAuth identity.
///
/// `OAuthConfig` is immutable once built and is `Clone + Send + Sync`, so a
/// single instance can back every concurrent install.
///
/// # Key Rotation
///
/// `old_api_secret_key` lets callbacks signed with the previous secret
/// validate while a rotation is in flight. The primary key is always tried first.
#[derive(Clone, Debug)]
pub struct OAuthConfig {
    app_name: Option<String>,
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    old_api_secret_key: Option<ApiSecretKey>,
    scopes: AuthScopes,
    host: Option<HostUrl>,
    redirect_path: String,
    access_mode: AccessMode,
    landing_url: String,
}

impl OAuthConfig {
    /// Creates a new builder for constructing an `OAuthConfig`.
    #[must_use]
    pub fn builder() -> OAuthConfigBuilder {
        OAuthConfigBuilder::new()
    }

    /// Builds a configuration from process environment variables.
    ///
    /// | Variable | Meaning | Required |
    /// |---|---|---|
    /// | `API_KEY` | client id | yes |
    /// | `API_SECRET` | client secret | yes |
    /// | `SCOPE` | comma-separated scopes | yes |
    /// | `SERVICE_URL` | public base URL of this app | yes |
    /// | `GRANT_OPTIONS` | `per-user` for online tokens | no |
    /// | `APP_NAME` | display name, used in logs | no |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] for an unset required variable,
    /// or the validation error of the offending value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`OAuthConfig::from_env`], reading values through `lookup`.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use shopify_oauth::{AccessMode, OAuthConfig};
    ///
    /// let vars = HashMap::from([
    ///     ("API_KEY", "key"),
    ///     ("API_SECRET", "secret"),
    ///     ("SCOPE", "read_products"),
    ///     ("SERVICE_URL", "https://myapp.example.com"),
    ///     ("GRANT_OPTIONS", "per-user"),
    /// ]);
    ///
    /// let config = OAuthConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.access_mode(), AccessMode::Online);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`OAuthConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar { name })
        };

        let mut builder = Self::builder()
            .api_key(ApiKey::new(required("API_KEY")?)?)
            .api_secret_key(ApiSecretKey::new(required("API_SECRET")?)?)
            .scopes(required("SCOPE")?.parse()?)
            .host(HostUrl::new(required("SERVICE_URL")?)?)
            .access_mode(lookup("GRANT_OPTIONS").unwrap_or_default().parse()?);

        if let Some(name) = lookup("APP_NAME").filter(|name| !name.trim().is_empty()) {
            builder = builder.app_name(name);
        }

        builder.build()
    }

    /// Returns the app name, if configured.
    #[must_use]
    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key.
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the old API secret key, if configured.
    #[must_use]
    pub const fn old_api_secret_key(&self) -> Option<&ApiSecretKey> {
        self.old_api_secret_key.as_ref()
    }

    /// Returns the requested OAuth scopes.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the host URL, if configured.
    #[must_use]
    pub const fn host(&self) -> Option<&HostUrl> {
        self.host.as_ref()
    }

    /// Returns the callback path on this app.
    #[must_use]
    pub fn redirect_path(&self) -> &str {
        &self.redirect_path
    }

    /// Returns the full `redirect_uri` (host + callback path), or `None`
    /// when no host is configured.
    #[must_use]
    pub fn redirect_uri(&self) -> Option<String> {
        self.host
            .as_ref()
            .map(|host| format!("{}{}", host.as_ref(), self.redirect_path))
    }

    /// Returns the requested access mode.
    #[must_use]
    pub const fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Returns the landing page the browser is sent to after a completed
    /// install, with `{shop}` substituted.
    #[must_use]
    pub fn landing_url(&self, shop: &ShopDomain) -> String {
        self.landing_url.replace("{shop}", shop.as_ref())
    }
}

// Verify OAuthConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthConfig>();
};

/// Builder for constructing [`OAuthConfig`] instances.
///
/// Required fields are `api_key` and `api_secret_key`.
///
/// # Defaults
///
/// - `scopes`: Empty (authorization requests are refused until set)
/// - `host`: `None` (authorization requests are refused until set)
/// - `redirect_path`: [`DEFAULT_REDIRECT_PATH`]
/// - `access_mode`: [`AccessMode::Offline`]
/// - `landing_url`: [`DEFAULT_LANDING_URL`]
#[derive(Debug, Default)]
pub struct OAuthConfigBuilder {
    app_name: Option<String>,
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    old_api_secret_key: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    host: Option<HostUrl>,
    redirect_path: Option<String>,
    access_mode: Option<AccessMode>,
    landing_url: Option<String>,
}

impl OAuthConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the app name.
    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the previous API secret key for key rotation.
    #[must_use]
    pub fn old_api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.old_api_secret_key = Some(key);
        self
    }

    /// Sets the requested OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the app's public base URL.
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the callback path (must start with `/`).
    #[must_use]
    pub fn redirect_path(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = Some(path.into());
        self
    }

    /// Sets the access mode.
    #[must_use]
    pub const fn access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = Some(mode);
        self
    }

    /// Sets the landing URL template. `{shop}` is replaced by the shop domain.
    #[must_use]
    pub fn landing_url(mut self, template: impl Into<String>) -> Self {
        self.landing_url = Some(template.into());
        self
    }

    /// Builds the [`OAuthConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` or
    /// `api_secret_key` are not set, and [`ConfigError::InvalidRedirectPath`]
    /// if the redirect path does not start with `/`.
    pub fn build(self) -> Result<OAuthConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self
            .api_secret_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_secret_key",
            })?;

        let redirect_path = self
            .redirect_path
            .unwrap_or_else(|| DEFAULT_REDIRECT_PATH.to_string());
        if !redirect_path.starts_with('/') {
            return Err(ConfigError::InvalidRedirectPath {
                path: redirect_path,
            });
        }

        Ok(OAuthConfig {
            app_name: self.app_name,
            api_key,
            api_secret_key,
            old_api_secret_key: self.old_api_secret_key,
            scopes: self.scopes.unwrap_or_default(),
            host: self.host,
            redirect_path,
            access_mode: self.access_mode.unwrap_or_default(),
            landing_url: self
                .landing_url
                .unwrap_or_else(|| DEFAULT_LANDING_URL.to_string()),
        })
    }
}
