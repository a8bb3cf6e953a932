//! Status enums for orders, payments, quotations and cash delivery.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Transitions beyond `Pending` are owned by the backend; the client only
/// reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Payment status reported alongside a payment-processing call.
///
/// The checkout flow submits `Completed`; the rest are backend-reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    #[default]
    Completed,
    Failed,
    Refunded,
}

/// Quotation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

/// Delivery sub-type for cash payments.
///
/// Cash-on-delivery is the only valid value in the current design; the
/// enum exists so new sub-types fail to compile until handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CashDeliveryKind {
    #[default]
    ContraEntrega,
}

impl std::fmt::Display for CashDeliveryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContraEntrega => write!(f, "contra_entrega"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(parsed, OrderStatus::Shipped);
    }

    #[test]
    fn test_payment_status_default_is_completed() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Completed);
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_cash_delivery_serde() {
        assert_eq!(
            serde_json::to_string(&CashDeliveryKind::ContraEntrega).unwrap(),
            "\"contra_entrega\""
        );
        assert_eq!(CashDeliveryKind::ContraEntrega.to_string(), "contra_entrega");
    }

    #[test]
    fn test_quotation_status_default() {
        assert_eq!(QuotationStatus::default(), QuotationStatus::Draft);
    }
}
