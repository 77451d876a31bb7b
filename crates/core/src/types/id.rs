//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! Product ids are only unique within the catalog that defines them, so the
//! cart identifies products by [`ProductKey`], which pairs the id with its
//! [`CatalogSlug`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use genset_spares_core::define_id;
/// define_id!(ProductId);
/// define_id!(OrderId);
///
/// let product_id = ProductId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

/// Errors from parsing a catalog slug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("catalog slug must not be empty")]
    Empty,
    #[error("invalid catalog slug '{0}': use lowercase letters, digits and '-'")]
    InvalidCharacters(String),
}

/// URL-safe name of a catalog (e.g. `avr`, `battery-charger`).
///
/// The empty slug is reserved for legacy cart entries persisted before
/// products carried their catalog. It can be deserialized but never parsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogSlug(String);

impl CatalogSlug {
    /// Parse a slug, rejecting empty strings and characters outside `[a-z0-9-]`.
    ///
    /// # Errors
    ///
    /// Returns `SlugError` if the slug is empty or malformed.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        let valid_chars = s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid_chars || s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::InvalidCharacters(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// The namespace of entries that predate catalog-qualified products.
    #[must_use]
    pub const fn legacy() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CatalogSlug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self::legacy())
        } else {
            Self::parse(&value)
        }
    }
}

impl From<CatalogSlug> for String {
    fn from(slug: CatalogSlug) -> Self {
        slug.0
    }
}

/// Globally unique product identity: a product id within its catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductKey {
    pub catalog: CatalogSlug,
    pub id: ProductId,
}

impl ProductKey {
    #[must_use]
    pub const fn new(catalog: CatalogSlug, id: ProductId) -> Self {
        Self { catalog, id }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.catalog.is_legacy() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}/{}", self.catalog, self.id)
        }
    }
}

/// Errors from parsing a [`ProductKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductKeyError {
    #[error("invalid product id '{0}'")]
    InvalidId(String),
    #[error(transparent)]
    InvalidCatalog(#[from] SlugError),
}

impl FromStr for ProductKey {
    type Err = ProductKeyError;

    /// Parse the display form: `catalog/id`, or a bare `id` for legacy entries.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (catalog, id) = match s.split_once('/') {
            Some((catalog, id)) => (CatalogSlug::parse(catalog)?, id),
            None => (CatalogSlug::legacy(), s),
        };
        let id = id
            .trim()
            .parse::<i32>()
            .map_err(|_| ProductKeyError::InvalidId(id.to_string()))?;
        Ok(Self::new(catalog, ProductId::new(id)))
    }
}
