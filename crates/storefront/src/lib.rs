//! Tienda Storefront client library.
//!
//! Client-side flows for a headless e-commerce storefront backed by a REST
//! API: catalog browsing, a server-authoritative cart, address management,
//! payment method selection and a gated multi-step checkout, plus a
//! quotation builder.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no optimistic updates, local
//!   state changes strictly follow server acknowledgment
//! - Every backend response is normalized into one canonical entity shape
//!   at the API boundary ([`api::conversions`]) before it enters component
//!   state
//! - Session state is an explicit [`session::Session`] value passed by
//!   reference to every operation that needs it, never an ambient global

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod addresses;
pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod payments;
pub mod quotations;
pub mod session;

pub use error::{Result, StoreError};
