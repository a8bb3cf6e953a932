//! Unified error handling.
//!
//! Each component owns its error enum; `StoreError` unifies them for
//! callers driving several flows. Nothing here is fatal to the process -
//! every failure is scoped to the current user action and leaves prior
//! state intact.

use thiserror::Error;

use crate::addresses::AddressError;
use crate::api::ApiError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::payments::PaymentError;
use crate::quotations::QuotationError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Cart mutation rejected or failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Address operation rejected or failed.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Payment method operation rejected or failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Checkout step transition or submission failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Quotation operation rejected or failed.
    #[error("Quotation error: {0}")]
    Quotation(#[from] QuotationError),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::from(ConfigError::MissingEnvVar("TIENDA_API_URL".to_string()));
        assert_eq!(
            err.to_string(),
            "Config error: Missing environment variable: TIENDA_API_URL"
        );
    }

    #[test]
    fn test_api_error_wraps() {
        let err = StoreError::from(ApiError::Malformed("no id".to_string()));
        assert!(err.to_string().contains("Malformed response"));
    }
}
