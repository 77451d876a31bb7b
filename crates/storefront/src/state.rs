//! Application state shared across views.

use std::sync::Arc;

use genset_spares_core::CartEntry;

use crate::cart::CartStore;
use crate::catalog::CatalogRegistry;
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::order::OrderSequence;
use crate::storage::{JsonFileStore, KeyValueStore};

/// Application state shared across all views.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backing store and the loaded catalogs. Each
/// view asks it for its own [`CartStore`] instead of reaching for a global
/// cart.
pub struct AppState<S = JsonFileStore> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    config: StorefrontConfig,
    catalogs: CatalogRegistry,
    store: Arc<S>,
}

impl AppState<JsonFileStore> {
    /// Open the file store and load catalogs named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// catalog directory cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let store = JsonFileStore::open(&config.data_dir)?;
        let catalogs = CatalogRegistry::load(&config.catalog_dir)?;
        tracing::info!(
            catalogs = catalogs.len(),
            data_dir = %config.data_dir.display(),
            "Storefront state initialized"
        );
        Ok(Self::with_store(config, catalogs, Arc::new(store)))
    }
}

impl<S: KeyValueStore> AppState<S> {
    /// Build state over an existing store.
    pub fn with_store(config: StorefrontConfig, catalogs: CatalogRegistry, store: Arc<S>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalogs,
                store,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the loaded catalogs.
    #[must_use]
    pub fn catalogs(&self) -> &CatalogRegistry {
        &self.inner.catalogs
    }

    /// Get a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.inner.store
    }

    /// A cart store for one view, hydrated from persisted state.
    #[must_use]
    pub fn cart_store(&self) -> CartStore<Arc<S>> {
        CartStore::open(Arc::clone(&self.inner.store), self.inner.config.quantity_policy)
    }

    /// The checkout view, preferring `handoff` over persisted state.
    #[must_use]
    pub fn checkout(&self, handoff: Option<Vec<CartEntry>>) -> Checkout<Arc<S>> {
        Checkout::open(
            Arc::clone(&self.inner.store),
            self.inner.config.quantity_policy,
            handoff,
        )
    }

    /// Last issued order number.
    #[must_use]
    pub fn last_order_number(&self) -> u64 {
        OrderSequence::new(self.inner.store.as_ref()).current()
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
