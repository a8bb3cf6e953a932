//! Type-specific payment forms.
//!
//! The field set of a payment form is a strict function of the method
//! kind, expressed as a tagged union so rendering and validation match
//! exhaustively - a new kind fails to compile until every match arm
//! handles it.

use tienda_core::{
    CardBrand, CashDeliveryKind, Email, luhn_valid, mask_card_number, validate_cvv,
    validate_expiration,
};

use super::PaymentError;
use crate::api::types::DatosMetodoPago;
use crate::models::PaymentKind;

/// A fillable payment form for one method kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentForm {
    Card {
        /// Card number; spaces allowed, Luhn-checked on validation.
        number: String,
        /// Expiration as `MM/YY`.
        expiration: String,
        /// 3 digits, or 4 for Amex.
        cvv: String,
        holder_name: String,
    },
    BankTransfer {
        /// Transaction reference number.
        reference: String,
    },
    Wallet {
        /// Account email address.
        email: String,
    },
    Cash {
        delivery: CashDeliveryKind,
    },
    Crypto {
        wallet_address: String,
    },
}

impl PaymentForm {
    /// An empty form for the given kind.
    #[must_use]
    pub fn empty(kind: PaymentKind) -> Self {
        match kind {
            PaymentKind::Card => Self::Card {
                number: String::new(),
                expiration: String::new(),
                cvv: String::new(),
                holder_name: String::new(),
            },
            PaymentKind::BankTransfer => Self::BankTransfer {
                reference: String::new(),
            },
            PaymentKind::Wallet => Self::Wallet {
                email: String::new(),
            },
            PaymentKind::Cash => Self::Cash {
                delivery: CashDeliveryKind::ContraEntrega,
            },
            PaymentKind::Crypto => Self::Crypto {
                wallet_address: String::new(),
            },
        }
    }

    /// The kind this form belongs to.
    #[must_use]
    pub const fn kind(&self) -> PaymentKind {
        match self {
            Self::Card { .. } => PaymentKind::Card,
            Self::BankTransfer { .. } => PaymentKind::BankTransfer,
            Self::Wallet { .. } => PaymentKind::Wallet,
            Self::Cash { .. } => PaymentKind::Cash,
            Self::Crypto { .. } => PaymentKind::Crypto,
        }
    }

    /// Validate the field set for this kind.
    ///
    /// All checks run client-side, before any network call.
    ///
    /// # Errors
    ///
    /// Returns the first failing field's error.
    pub fn validate(&self) -> Result<(), PaymentError> {
        match self {
            Self::Card {
                number,
                expiration,
                cvv,
                holder_name,
            } => {
                let brand = CardBrand::detect(number);
                if brand == CardBrand::Unknown || !luhn_valid(number) {
                    return Err(PaymentError::InvalidCardNumber);
                }
                if !validate_expiration(expiration) {
                    return Err(PaymentError::InvalidExpiration);
                }
                if !validate_cvv(cvv, brand) {
                    return Err(PaymentError::InvalidCvv);
                }
                if holder_name.trim().is_empty() {
                    return Err(PaymentError::MissingHolderName);
                }
                Ok(())
            }
            Self::BankTransfer { reference } => {
                if reference.trim().is_empty() {
                    return Err(PaymentError::MissingReference);
                }
                Ok(())
            }
            Self::Wallet { email } => {
                Email::parse(email)?;
                Ok(())
            }
            // Single-variant enum: construction already guarantees validity
            Self::Cash { delivery: _ } => Ok(()),
            Self::Crypto { wallet_address } => {
                if wallet_address.trim().is_empty() {
                    return Err(PaymentError::MissingWalletAddress);
                }
                Ok(())
            }
        }
    }

    /// Short masked description for review screens; never includes a full
    /// card number or CVV.
    #[must_use]
    pub fn masked_summary(&self) -> String {
        match self {
            Self::Card { number, .. } => mask_card_number(number),
            Self::BankTransfer { reference } => format!("transfer ref. {reference}"),
            Self::Wallet { email } => email.clone(),
            Self::Cash { delivery } => delivery.to_string(),
            Self::Crypto { wallet_address } => wallet_address.clone(),
        }
    }

    /// Wire payload for saving this form.
    pub(crate) fn to_datos(&self) -> DatosMetodoPago {
        match self {
            Self::Card {
                number,
                expiration,
                cvv,
                holder_name,
            } => DatosMetodoPago::Card {
                numero: number.clone(),
                expiracion: expiration.clone(),
                cvv: cvv.clone(),
                titular: holder_name.clone(),
            },
            Self::BankTransfer { reference } => DatosMetodoPago::BankTransfer {
                referencia: reference.clone(),
            },
            Self::Wallet { email } => DatosMetodoPago::Wallet {
                correo: email.clone(),
            },
            Self::Cash { delivery } => DatosMetodoPago::Cash { entrega: *delivery },
            Self::Crypto { wallet_address } => DatosMetodoPago::Crypto {
                direccion_wallet: wallet_address.clone(),
            },
        }
    }
}
