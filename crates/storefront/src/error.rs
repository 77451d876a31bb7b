//! Unified error handling.
//!
//! Provides a unified `AppError` type for storefront operations. Views that
//! touch more than one concern should return `Result<T, AppError>`.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::contact::ContactError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persistent storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog data could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout could not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Contact link could not be built.
    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the error is caused by user input rather than the system,
    /// i.e. worth showing as-is instead of logging as a failure.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::BadRequest(_) | Self::Checkout(CheckoutError::EmptyCart)
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("catalog 'avr'".to_string());
        assert_eq!(err.to_string(), "Not found: catalog 'avr'");

        let err = AppError::BadRequest("quantity must be positive".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity must be positive");

        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Checkout error: cart is empty");
    }

    #[test]
    fn test_user_facing_errors() {
        assert!(AppError::NotFound("x".to_string()).is_user_facing());
        assert!(AppError::from(CheckoutError::EmptyCart).is_user_facing());
        assert!(!AppError::from(StorageError::Poisoned).is_user_facing());
    }
}
