//! Monotonic order numbering persisted next to the cart.
//!
//! The counter survives cart clears and restarts; it is never decremented.
//! Issuing a number reads the stored value strictly: if it cannot be read
//! or parsed, no number is issued and the stored value is left alone.

use crate::storage::{KeyValueStore, StorageError, keys};

/// Order number counter stored under [`keys::ORDER_SEQUENCE`].
#[derive(Debug)]
pub struct OrderSequence<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> OrderSequence<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Last issued number for display; 0 before the first order.
    ///
    /// An unreadable or malformed value is logged and shown as 0.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.stored().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read order sequence");
            0
        })
    }

    /// Issue the next number and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored counter cannot be read, does not
    /// hold a number, or the new value cannot be saved. A number is never
    /// handed out twice.
    pub fn next(&self) -> Result<u64, StorageError> {
        let next = self.stored()?.saturating_add(1);
        self.store.save(keys::ORDER_SEQUENCE, &next.to_string())?;
        tracing::debug!(sequence = next, "Issued order number");
        Ok(next)
    }

    fn stored(&self) -> Result<u64, StorageError> {
        match self.store.load(keys::ORDER_SEQUENCE)? {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| StorageError::InvalidValue {
                    key: keys::ORDER_SEQUENCE,
                    value: raw,
                }),
        }
    }
}
