//! The admin user behind an online-mode access token.

use serde::{Deserialize, Serialize};

/// The Shopify admin user who approved an online-mode install.
///
/// Deserialized from the `associated_user` object of the token endpoint
/// response. Offline tokens never carry one.
///
/// ```rust
/// use shopify_oauth::AssociatedUser;
///
/// let user: AssociatedUser = serde_json::from_str(r#"{
///     "id": 902541635,
///     "first_name": "John",
///     "last_name": "Smith",
///     "email": "john@example.com",
///     "email_verified": true,
///     "account_owner": true,
///     "locale": "en",
///     "collaborator": false
/// }"#).unwrap();
///
/// assert_eq!(user.id, 902541635);
/// assert!(user.account_owner);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedUser {
    /// The Shopify user ID.
    pub id: u64,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Email address.
    pub email: String,

    /// Whether the email address has been verified.
    pub email_verified: bool,

    /// Whether the user owns the shop's account.
    pub account_owner: bool,

    /// Locale preference, e.g. `en` or `fr`.
    pub locale: String,

    /// Whether the user is a collaborator account.
    pub collaborator: bool,
}

impl AssociatedUser {
    /// Returns `"first last"`, trimmed when either part is empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
