//! Cart change notifications.
//!
//! Views subscribe to a [`CartStore`](super::CartStore) to react to changes,
//! e.g. to show a short-lived "added to cart" confirmation.

use std::time::{Duration, Instant};

use genset_spares_core::ProductKey;

/// How long an "added to cart" confirmation stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Something that happened to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// `added` units of a product went into the cart; `quantity` is the
    /// entry's new total.
    ItemAdded {
        key: ProductKey,
        name: String,
        added: u32,
        quantity: u32,
    },
    /// The cart was emptied.
    Cleared,
}

pub(crate) type Listener = Box<dyn Fn(&CartEvent) + Send + Sync>;

/// Transient confirmation shown after an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedNotice {
    pub product_name: String,
    pub added: u32,
    pub shown_at: Instant,
}

impl AddedNotice {
    #[must_use]
    pub fn new(product_name: impl Into<String>, added: u32) -> Self {
        Self {
            product_name: product_name.into(),
            added,
            shown_at: Instant::now(),
        }
    }

    /// Whether the notice is still on screen at `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < NOTICE_TTL
    }
}
