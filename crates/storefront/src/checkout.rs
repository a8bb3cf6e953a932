//! Multi-step checkout wizard.
//!
//! A strict forward sequence - address, payment, review - plus a terminal
//! success state. Advancing validates the current step; going back never
//! does. Confirmation creates the order and processes the payment in two
//! backend calls, and any failure keeps the wizard on the review step with
//! the order state left to the server.

use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use tienda_core::{Money, OrderId, PaymentStatus};

use crate::addresses::AddressBook;
use crate::api::types::PagoRequest;
use crate::api::{ApiClient, ApiError};
use crate::cart::CartStore;
use crate::payments::{PaymentError, PaymentSelector, SelectedPayment};
use crate::session::Session;

/// Errors surfaced by checkout transitions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Advancing past the address step requires a selection.
    #[error("no shipping address selected")]
    NoAddressSelected,

    /// Advancing past the payment step requires a valid selection.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Confirmation with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The requested transition is not available from the current step.
    #[error("operation not available on the {0} step")]
    WrongStep(CheckoutStep),

    /// Backend call failed; the wizard stays on the review step.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The wizard's steps, in order, plus the terminal success state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Address,
    Payment,
    Review,
    Complete,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Address => "address",
            Self::Payment => "payment",
            Self::Review => "review",
            Self::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

/// The confirmed order, shown on the success screen.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub total: Money,
}

/// Drives the address -> payment -> review sequence and the final
/// order-plus-payment submission.
#[derive(Debug)]
pub struct CheckoutWizard {
    api: ApiClient,
    step: CheckoutStep,
    notes: Option<String>,
    confirmation: Option<OrderConfirmation>,
}

impl CheckoutWizard {
    /// Start a wizard on the address step.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            step: CheckoutStep::Address,
            notes: None,
            confirmation: None,
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The confirmation, once the wizard reached [`CheckoutStep::Complete`].
    #[must_use]
    pub const fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Optional order notes, sent with the order on confirmation.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes.filter(|n| !n.trim().is_empty());
    }

    /// Leave the address step; requires a selected address.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] off the address step, or
    /// [`CheckoutError::NoAddressSelected`] without a selection.
    pub fn advance_from_address(&mut self, addresses: &AddressBook) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Address {
            return Err(CheckoutError::WrongStep(self.step));
        }
        if addresses.selected().is_none() {
            return Err(CheckoutError::NoAddressSelected);
        }
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Leave the payment step; requires a complete, valid payment
    /// selection.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] off the payment step, or the
    /// selection's validation error.
    pub fn advance_from_payment(
        &mut self,
        payments: &PaymentSelector,
    ) -> Result<SelectedPayment, CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep(self.step));
        }
        let selected = payments.validated_selection()?;
        self.step = CheckoutStep::Review;
        Ok(selected)
    }

    /// Step backwards. Always permitted before completion; earlier input
    /// is kept and not revalidated.
    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Address | CheckoutStep::Complete => self.step,
            CheckoutStep::Payment => CheckoutStep::Address,
            CheckoutStep::Review => CheckoutStep::Payment,
        };
    }

    /// Submit the order from the review step.
    ///
    /// Creates the order against the selected address, then processes a
    /// payment for the cart total with a client-generated transaction id.
    /// Both calls succeeding moves the wizard to the terminal step; any
    /// failure leaves it on review so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] off the review step,
    /// [`CheckoutError::EmptyCart`] with no cart lines, a payment
    /// validation error, or an [`ApiError`] from either backend call.
    #[instrument(skip_all)]
    pub async fn confirm(
        &mut self,
        session: &Session,
        cart: &CartStore,
        addresses: &AddressBook,
        payments: &PaymentSelector,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::WrongStep(self.step));
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let address_id = addresses
            .selected()
            .ok_or(CheckoutError::NoAddressSelected)?;
        let payment = payments.validated_selection()?;

        let order = self
            .api
            .create_order(session, address_id, self.notes.clone())
            .await?;
        tracing::info!(order_id = %order.id, "order created");

        let request = PagoRequest {
            metodo_pago: payment.kind.as_str().to_string(),
            monto: cart.total().amount(),
            estado: PaymentStatus::Completed,
            id_transaccion: Uuid::new_v4().to_string(),
        };
        let receipt = self.api.process_payment(session, order.id, &request).await?;
        tracing::info!(
            order_id = %receipt.order_id,
            transaction_id = %receipt.transaction_id,
            "payment processed"
        );

        let confirmation = OrderConfirmation {
            order_id: order.id,
            total: cart.total(),
        };
        self.confirmation = Some(confirmation.clone());
        self.step = CheckoutStep::Complete;
        Ok(confirmation)
    }
}
