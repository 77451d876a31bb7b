//! Product catalogs loaded from YAML files.
//!
//! Every category page is the same view over different data: one YAML file
//! per catalog in the catalog directory, named after its slug
//! (`avr.yaml` -> `avr`).
//!
//! ```yaml
//! title: Automatic Voltage Regulators
//! tagline: Stable output for every alternator
//! display:
//!   show_discount_badge: true
//!   show_contact_header: true
//!   quantity_selector: true
//! products:
//!   - id: 1
//!     name: AVR (UEI-01)
//!     description: Basic Automatic Voltage Regulator
//!     price: 550
//!     originalPrice: 688
//!     image: /UEI.png
//! ```
//!
//! Product ids only need to be unique within their file; loading stamps each
//! product with its catalog slug so cart keys never collide across catalogs.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use genset_spares_core::{CatalogSlug, Product, ProductId, ProductKey, SlugError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog {slug}: {message}")]
    Parse { slug: String, message: String },

    #[error("invalid catalog file name: {0}")]
    InvalidSlug(#[from] SlugError),

    #[error("catalog {catalog} lists product id {id} more than once")]
    DuplicateProductId { catalog: CatalogSlug, id: ProductId },

    #[error("catalog {0} is defined twice")]
    DuplicateCatalog(CatalogSlug),
}

/// Per-catalog presentation switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Show "N% off" next to discounted prices.
    pub show_discount_badge: bool,
    /// Show the shop's phone number in the page header.
    pub show_contact_header: bool,
    /// Let shoppers pick a quantity before adding to the cart.
    pub quantity_selector: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_discount_badge: true,
            show_contact_header: false,
            quantity_selector: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    title: String,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    display: DisplayOptions,
    #[serde(default)]
    products: Vec<Product>,
}

/// A category page's worth of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub slug: CatalogSlug,
    pub title: String,
    pub tagline: Option<String>,
    pub display: DisplayOptions,
    pub products: Vec<Product>,
}

impl Catalog {
    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed YAML and
    /// `CatalogError::DuplicateProductId` if two products share an id.
    pub fn from_yaml(slug: CatalogSlug, yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse {
            slug: slug.to_string(),
            message: e.to_string(),
        })?;
        Self::new(slug, file.title, file.tagline, file.display, file.products)
    }

    /// Assemble a catalog, stamping every product with `slug`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateProductId` if two products share an id.
    pub fn new(
        slug: CatalogSlug,
        title: String,
        tagline: Option<String>,
        display: DisplayOptions,
        mut products: Vec<Product>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &mut products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateProductId {
                    catalog: slug,
                    id: product.id,
                });
            }
            product.catalog = slug.clone();

            // Data-quality issue in the catalog, not something to correct here
            if product.original_price.is_some_and(|original| original < product.price) {
                tracing::warn!(
                    catalog = %slug,
                    product = %product.id,
                    "originalPrice is below price"
                );
            }
        }

        Ok(Self {
            slug,
            title,
            tagline,
            display,
            products,
        })
    }

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// All catalogs, ordered by slug.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: BTreeMap<CatalogSlug, Catalog>,
}

impl CatalogRegistry {
    /// Load every `*.yaml`/`*.yml` file in `dir`.
    ///
    /// A missing directory yields an empty registry. Files that fail to
    /// parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the directory exists but cannot be read.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let mut registry = Self::default();

        if !dir.exists() {
            tracing::warn!("Catalog directory does not exist: {:?}", dir);
            return Ok(registry);
        }

        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml"))
            .collect();
        paths.sort();

        for path in paths {
            match Self::load_catalog(&path) {
                Ok(catalog) => {
                    tracing::info!(
                        catalog = %catalog.slug,
                        products = catalog.products.len(),
                        "Loaded catalog"
                    );
                    if let Err(e) = registry.insert(catalog) {
                        tracing::error!("Skipping catalog {:?}: {}", path, e);
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to load catalog {:?}: {}", path, e);
                }
            }
        }

        Ok(registry)
    }

    fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SlugError::InvalidCharacters(path.display().to_string()))?;
        let slug = CatalogSlug::parse(stem)?;
        let content = std::fs::read_to_string(path)?;
        Catalog::from_yaml(slug, &content)
    }

    /// Add a catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateCatalog` if the slug is taken.
    pub fn insert(&mut self, catalog: Catalog) -> Result<(), CatalogError> {
        if self.catalogs.contains_key(&catalog.slug) {
            return Err(CatalogError::DuplicateCatalog(catalog.slug));
        }
        self.catalogs.insert(catalog.slug.clone(), catalog);
        Ok(())
    }

    #[must_use]
    pub fn catalog(&self, slug: &CatalogSlug) -> Option<&Catalog> {
        self.catalogs.get(slug)
    }

    /// Look a catalog up by its slug string.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&Catalog> {
        CatalogSlug::parse(slug)
            .ok()
            .and_then(|slug| self.catalogs.get(&slug))
    }

    #[must_use]
    pub fn product(&self, key: &ProductKey) -> Option<&Product> {
        self.catalog(&key.catalog)?.product(key.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Catalog> {
        self.catalogs.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const LLOP: &str = r"
title: LLOP Switches
products:
  - id: 401
    name: LLOP Model A
    description: Standard LLOP unit
    price: 980
    originalPrice: 1225
    image: /pic4.png
  - id: 402
    name: LLOP Model B
    price: 1280
    originalPrice: 1600
";

    fn slug(s: &str) -> CatalogSlug {
        CatalogSlug::parse(s).unwrap()
    }

    #[test]
    fn test_from_yaml_stamps_catalog() {
        let catalog = Catalog::from_yaml(slug("llop"), LLOP).unwrap();

        assert_eq!(catalog.title, "LLOP Switches");
        assert_eq!(catalog.display, DisplayOptions::default());
        assert_eq!(catalog.products.len(), 2);
        assert!(catalog.products.iter().all(|p| p.catalog == slug("llop")));

        let model_b = catalog.product(ProductId::new(402)).unwrap();
        assert_eq!(model_b.price, Decimal::from(1280));
        assert!(model_b.description.is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let yaml = r"
title: Broken
products:
  - { id: 1, name: A, price: 10 }
  - { id: 1, name: B, price: 20 }
";
        let err = Catalog::from_yaml(slug("broken"), yaml).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProductId { .. }));
    }

    #[test]
    fn test_display_flags_parsed() {
        let yaml = r"
title: Panels
display:
  show_contact_header: true
  show_discount_badge: false
";
        let catalog = Catalog::from_yaml(slug("panel"), yaml).unwrap();
        assert!(catalog.display.show_contact_header);
        assert!(!catalog.display.show_discount_badge);
        assert!(catalog.display.quantity_selector);
        assert!(catalog.products.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = Catalog::from_yaml(slug("x"), "title: [unclosed").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_registry_load_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("llop.yaml"), LLOP).unwrap();
        std::fs::write(dir.path().join("broken.yaml"), "products: 12").unwrap();
        std::fs::write(dir.path().join("Bad Name.yaml"), LLOP).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = CatalogRegistry::load(dir.path()).unwrap();

        assert_eq!(registry.len(), 1);
        let key = ProductKey::new(slug("llop"), ProductId::new(401));
        assert_eq!(registry.product(&key).unwrap().name, "LLOP Model A");
        assert!(registry.find("broken").is_none());
    }

    #[test]
    fn test_registry_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = CatalogRegistry::load(&dir.path().join("nope")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_id_in_two_catalogs_resolves_separately() {
        let mut registry = CatalogRegistry::default();
        registry
            .insert(Catalog::from_yaml(slug("avr"), "title: AVR\nproducts:\n  - { id: 1, name: AVR (UEI-01), price: 550 }").unwrap())
            .unwrap();
        registry
            .insert(Catalog::from_yaml(slug("diode"), "title: Diodes\nproducts:\n  - { id: 1, name: Diode D1, price: 90 }").unwrap())
            .unwrap();

        let avr = registry.product(&ProductKey::new(slug("avr"), ProductId::new(1))).unwrap();
        let diode = registry.product(&ProductKey::new(slug("diode"), ProductId::new(1))).unwrap();
        assert_ne!(avr.key(), diode.key());
        assert_eq!(diode.name, "Diode D1");
    }

    #[test]
    fn test_duplicate_catalog_rejected() {
        let mut registry = CatalogRegistry::default();
        registry.insert(Catalog::from_yaml(slug("avr"), "title: A").unwrap()).unwrap();
        let err = registry
            .insert(Catalog::from_yaml(slug("avr"), "title: B").unwrap())
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCatalog(_)));
    }
}
