//! Integration tests for Genset Spares.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p genset-spares-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - cart state shared between views over one data directory
//! - `checkout_flow` - handoff, order numbering and contact links
//! - `catalogs` - the bundled catalog files
//!
//! Every test runs against a fresh temporary data directory; nothing outside
//! it is touched.

use std::path::{Path, PathBuf};

use genset_spares_core::{Product, ProductKey};
use genset_spares_storefront::config::StorefrontConfig;
use genset_spares_storefront::state::AppState;
use tempfile::TempDir;

/// Catalog files shipped with the storefront crate.
#[must_use]
pub fn bundled_catalog_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/catalogs")
}

/// A storefront over a throwaway data directory and the bundled catalogs.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// # Panics
    ///
    /// Panics if the temporary directory or state cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let state = open_state(dir.path(), &[]);
        Self { dir, state }
    }

    /// Like [`TestContext::new`] with extra `GS_*` variables.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or state cannot be created.
    #[must_use]
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let state = open_state(dir.path(), vars);
        Self { dir, state }
    }

    /// Fresh state over the same data directory, as a new page load or a
    /// second process would see it.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be created.
    #[must_use]
    pub fn reopen(&self) -> AppState {
        open_state(self.dir.path(), &[])
    }

    /// Path of the backing storage document.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.state.store().path()
    }

    /// Look up a bundled product by `catalog/id`.
    ///
    /// # Panics
    ///
    /// Panics if the key is malformed or the product does not exist.
    #[must_use]
    pub fn product(&self, key: &str) -> Product {
        let key: ProductKey = key.parse().expect("Invalid product key");
        self.state
            .catalogs()
            .product(&key)
            .cloned()
            .unwrap_or_else(|| panic!("No product {key} in bundled catalogs"))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn open_state(data_dir: &Path, vars: &[(&str, &str)]) -> AppState {
    let data_dir = data_dir.to_string_lossy().into_owned();
    let catalog_dir = bundled_catalog_dir().to_string_lossy().into_owned();
    let config = StorefrontConfig::from_lookup(|key| match key {
        "GS_DATA_DIR" => Some(data_dir.clone()),
        "GS_CATALOG_DIR" => Some(catalog_dir.clone()),
        _ => vars
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_string()),
    })
    .expect("Invalid test configuration");
    AppState::new(config).expect("Failed to open storefront state")
}
