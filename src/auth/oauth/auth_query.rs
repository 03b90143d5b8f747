//! Raw query parameters of an inbound OAuth request.
//!
//! Shopify signs *every* query parameter it sends, so [`AuthQuery`] keeps all
//! of them in arrival order rather than only the well-known ones. Accessors
//! return `None` for absent parameters; nothing here is trusted until it has
//! passed [`validate_auth_callback`](crate::auth::oauth::validate_auth_callback).

use std::collections::BTreeMap;

/// Query parameter carrying the request signature.
pub const HMAC_PARAM: &str = "hmac";
/// Legacy signature parameter, also excluded from the signed message.
pub const SIGNATURE_PARAM: &str = "signature";
/// Query parameter carrying the shop domain.
pub const SHOP_PARAM: &str = "shop";
/// Query parameter carrying the request timestamp.
pub const TIMESTAMP_PARAM: &str = "timestamp";
/// Query parameter carrying the nonce.
pub const STATE_PARAM: &str = "state";
/// Query parameter carrying the base64 admin host.
pub const HOST_PARAM: &str = "host";
/// Query parameter carrying the authorization code.
pub const CODE_PARAM: &str = "code";

/// Raw, untrusted query parameters of a start-install or callback request.
///
/// ```rust
/// use shopify_oauth::AuthQuery;
///
/// let query = AuthQuery::parse("shop=my-store.myshopify.com&code=abc&state=n0nce&hmac=ff");
///
/// assert_eq!(query.shop(), Some("my-store.myshopify.com"));
/// assert_eq!(query.code(), Some("abc"));
/// assert_eq!(query.to_signable_string(), "code=abc&shop=my-store.myshopify.com&state=n0nce");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthQuery {
    params: Vec<(String, String)>,
}

impl AuthQuery {
    /// Parses a raw `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Returns the first value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`, replacing every existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.params.retain(|(k, _)| *k != key);
        self.params.push((key, value.into()));
    }

    /// Iterates over every `(key, value)` pair in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The `shop` parameter.
    #[must_use]
    pub fn shop(&self) -> Option<&str> {
        self.get(SHOP_PARAM)
    }

    /// The `hmac` parameter.
    #[must_use]
    pub fn hmac(&self) -> Option<&str> {
        self.get(HMAC_PARAM)
    }

    /// The `timestamp` parameter.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP_PARAM)
    }

    /// The `state` parameter.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.get(STATE_PARAM)
    }

    /// The `code` parameter.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get(CODE_PARAM)
    }

    /// The `host` parameter.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.get(HOST_PARAM)
    }

    /// Builds the message Shopify signs: every parameter except `hmac` and
    /// `signature`, sorted by key, joined as `key=value` with `&`.
    ///
    /// Values are the decoded values. A key that occurs more than once is
    /// rendered in Shopify's array form, `ids=["1", "2"]`.
    #[must_use]
    pub fn to_signable_string(&self) -> String {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (key, value) in self.iter() {
            if key == HMAC_PARAM || key == SIGNATURE_PARAM {
                continue;
            }
            grouped.entry(key).or_default().push(value);
        }

        grouped
            .into_iter()
            .map(|(key, values)| match values.as_slice() {
                [single] => format!("{key}={single}"),
                many => {
                    let quoted = many
                        .iter()
                        .map(|v| format!("\"{v}\""))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{key}=[{quoted}]")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for AuthQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
