//! Core types for the Tienda storefront client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod card;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use card::{
    CardBrand, format_card_number, format_expiration_date, luhn_valid, mask_card_number,
    validate_cvv, validate_expiration, validate_expiration_at,
};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::Money;
pub use status::*;
