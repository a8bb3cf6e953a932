//! Canonical domain entities for the storefront.
//!
//! These types are the only shapes that enter component state. Raw backend
//! responses (with their inconsistent field naming) are mapped into them in
//! [`crate::api::conversions`] and nowhere else.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tienda_core::{
    AddressId, CartLineId, CategoryId, ClientId, Money, OrderId, OrderStatus, PaymentStatus,
    PaymentTemplateId, ProductId, QuotationId, QuotationItemId, QuotationStatus, SavedMethodId,
};

// =============================================================================
// Catalog
// =============================================================================

/// A product in the catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Money,
    /// Units available; authoritative stock lives on the server.
    pub stock: u32,
    pub category_id: Option<CategoryId>,
    pub image_url: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// One product-quantity pairing in the client's active cart.
///
/// `line_id` is the server-assigned id every remote mutation is keyed by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub line_id: CartLineId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// Stock known at the time the server last confirmed this line.
    pub available_stock: u32,
    pub image_url: Option<String>,
}

impl CartLine {
    /// Line total at the server-confirmed unit price.
    #[must_use]
    pub fn total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// A shipping address belonging to the logged-in client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    /// At most one address per client is primary; the server enforces it.
    pub is_primary: bool,
}

/// Form data for creating or editing an address.
#[derive(Debug, Clone, Default)]
pub struct AddressForm {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_primary: bool,
}

// =============================================================================
// Payments
// =============================================================================

/// The five payment method kinds the storefront understands.
///
/// Kept as a closed enum so form rendering and validation match
/// exhaustively; a new kind fails to compile until handled everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Card,
    BankTransfer,
    Wallet,
    Cash,
    Crypto,
}

impl PaymentKind {
    /// Wire name of the kind (e.g. `bank_transfer`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::Wallet => "wallet",
            Self::Cash => "cash",
            Self::Crypto => "crypto",
        }
    }
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "bank_transfer" => Ok(Self::BankTransfer),
            "wallet" => Ok(Self::Wallet),
            "cash" => Ok(Self::Cash),
            "crypto" => Ok(Self::Crypto),
            _ => Err(format!("unknown payment kind: {s}")),
        }
    }
}

/// Immutable payment method reference data fetched from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodTemplate {
    pub id: PaymentTemplateId,
    pub display_name: String,
    pub kind: PaymentKind,
    pub icon_url: Option<String>,
    pub visible: bool,
    pub active_online: bool,
    pub display_order: i32,
}

/// A previously persisted, partially-masked payment instrument.
///
/// Only masked fields ever come back from the server; no raw card number
/// or CVV is reloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPaymentMethod {
    pub id: SavedMethodId,
    pub alias: String,
    pub template_id: PaymentTemplateId,
    pub kind: PaymentKind,
    /// E.g. `****-****-****-1111` for a card.
    pub masked_detail: Option<String>,
    pub verified: bool,
    pub is_default: bool,
}

// =============================================================================
// Orders
// =============================================================================

/// An order as returned by the backend after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub shipping_address_id: AddressId,
    pub total: Money,
    pub status: OrderStatus,
}

/// Acknowledgment of a processed payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub order_id: OrderId,
    pub amount: Money,
    pub status: PaymentStatus,
    pub transaction_id: String,
}

// =============================================================================
// Quotations
// =============================================================================

/// One line of a quotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationItem {
    pub id: QuotationItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
    pub discount_percent: Decimal,
}

impl QuotationItem {
    /// `quantity * unit_price` with the percentage discount applied.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.line_total(self.quantity, self.discount_percent)
    }
}

/// A pre-sale itemized price proposal, distinct from an order.
///
/// Built incrementally: the header is created first (assigning the id),
/// then items are appended against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub id: QuotationId,
    pub client_id: ClientId,
    pub expiration_date: NaiveDate,
    pub notes: Option<String>,
    pub status: QuotationStatus,
    pub items: Vec<QuotationItem>,
}

impl Quotation {
    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(QuotationItem::line_total).sum()
    }

    /// Tax is zero in the current design.
    #[must_use]
    pub const fn tax(&self) -> Money {
        Money::ZERO
    }

    /// `subtotal + tax`.
    #[must_use]
    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }
}

// =============================================================================
// Clients
// =============================================================================

/// Profile of the logged-in client, as returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    pub id: ClientId,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cart_line_total() {
        let line = CartLine {
            line_id: CartLineId::new(1),
            product_id: ProductId::new(7),
            name: "Widget".to_string(),
            unit_price: Money::from_major(50),
            quantity: 2,
            available_stock: 10,
            image_url: None,
        };
        assert_eq!(line.total(), Money::from_major(100));
    }

    #[test]
    fn test_quotation_totals_zero_tax() {
        let quotation = Quotation {
            id: QuotationId::new(1),
            client_id: ClientId::new(9),
            expiration_date: NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
            notes: None,
            status: QuotationStatus::Draft,
            items: vec![
                QuotationItem {
                    id: QuotationItemId::new(1),
                    product_id: ProductId::new(7),
                    quantity: 3,
                    unit_price: Money::from_major(20),
                    discount_percent: dec!(10),
                },
                QuotationItem {
                    id: QuotationItemId::new(2),
                    product_id: ProductId::new(8),
                    quantity: 1,
                    unit_price: Money::from_major(6),
                    discount_percent: Decimal::ZERO,
                },
            ],
        };

        assert_eq!(quotation.subtotal().amount(), dec!(60));
        assert_eq!(quotation.tax(), Money::ZERO);
        assert_eq!(quotation.total().amount(), dec!(60));
    }

    #[test]
    fn test_payment_kind_roundtrip() {
        for kind in [
            PaymentKind::Card,
            PaymentKind::BankTransfer,
            PaymentKind::Wallet,
            PaymentKind::Cash,
            PaymentKind::Crypto,
        ] {
            let parsed: PaymentKind = kind.as_str().parse().expect("roundtrip");
            assert_eq!(parsed, kind);
        }
        assert!("paypal".parse::<PaymentKind>().is_err());
    }
}
