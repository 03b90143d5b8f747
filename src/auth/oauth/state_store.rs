//! Per-shop storage of pending OAuth nonces.
//!
//! [`StateStore`] remembers, for each shop with an install in progress, the
//! nonce that was placed in the authorization URL. The callback for that shop
//! must present the same nonce, and the entry is removed on the first check
//! whether it matches or not.
//!
//! The store is a cheap handle: clones share the same map. It is backed by a
//! sharded [`DashMap`], so installs for different shops do not contend and
//! every operation on a single shop is atomic.
//!
//! ```rust
//! use shopify_oauth::{ShopDomain, StateParam, StateStore};
//!
//! let store = StateStore::new();
//! let shop = ShopDomain::new("my-store").unwrap();
//! let nonce = StateParam::new();
//!
//! store.put(shop.clone(), nonce.clone());
//! assert!(store.take_if_matches(&shop, nonce.as_ref()));
//! assert!(!store.take_if_matches(&shop, nonce.as_ref()));
//! ```

use crate::auth::oauth::hmac::constant_time_compare;
use crate::auth::oauth::StateParam;
use crate::config::ShopDomain;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// One outstanding authorization attempt.
#[derive(Clone, Debug)]
pub struct PendingState {
    /// The shop being installed.
    pub shop: ShopDomain,
    /// The nonce sent as `state`.
    pub nonce: StateParam,
    /// When the authorization URL was issued.
    pub issued_at: DateTime<Utc>,
}

/// In-memory map from shop to its pending nonce.
#[derive(Clone, Debug, Default)]
pub struct StateStore {
    pending: Arc<DashMap<ShopDomain, PendingState>>,
    max_age: Option<Duration>,
}

impl StateStore {
    /// Creates an empty store whose entries never expire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose entries are treated as absent once older
    /// than `max_age`.
    #[must_use]
    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            pending: Arc::default(),
            max_age: Some(max_age),
        }
    }

    /// Returns the configured maximum age, if any.
    #[must_use]
    pub const fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Records `nonce` as the pending nonce for `shop`, replacing any
    /// earlier one.
    pub fn put(&self, shop: ShopDomain, nonce: StateParam) {
        let pending = PendingState {
            shop: shop.clone(),
            nonce,
            issued_at: Utc::now(),
        };
        if self.pending.insert(shop, pending).is_some() {
            tracing::debug!("Superseded pending OAuth state");
        }
    }

    /// Removes the pending entry for `shop` and returns `true` only if it
    /// existed, had not expired, and equals `candidate`.
    ///
    /// The entry is removed in every case, so a nonce can be checked at most
    /// once. Two concurrent calls for the same shop can never both succeed.
    #[must_use]
    pub fn take_if_matches(&self, shop: &ShopDomain, candidate: &str) -> bool {
        let Some((_, pending)) = self.pending.remove(shop) else {
            return false;
        };

        if self.is_expired(&pending, Utc::now()) {
            tracing::debug!(shop = %shop, "Pending OAuth state expired");
            return false;
        }

        constant_time_compare(pending.nonce.as_ref(), candidate)
    }

    /// Returns a copy of the pending entry for `shop` without consuming it.
    #[must_use]
    pub fn peek(&self, shop: &ShopDomain) -> Option<PendingState> {
        self.pending.get(shop).map(|entry| entry.value().clone())
    }

    /// Drops every expired entry. Does nothing when no maximum age is set.
    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.pending.retain(|_, pending| !self.is_expired(pending, now));
    }

    /// Number of shops with a pending authorization.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no authorization is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn is_expired(&self, pending: &PendingState, now: DateTime<Utc>) -> bool {
        self.max_age.is_some_and(|max_age| now - pending.issued_at > max_age)
    }
}

// Verify StateStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateStore>();
};
