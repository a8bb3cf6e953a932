//! Tienda Core - Shared types library.
//!
//! This crate provides common types used across the Tienda storefront
//! client:
//! - `storefront` - Cart, checkout, address, payment and quotation flows
//! - `integration-tests` - End-to-end flows against a mocked backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, card-number
//!   helpers, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
