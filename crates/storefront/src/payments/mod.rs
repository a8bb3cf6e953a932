//! Payment method selection.
//!
//! Loads the global method templates and the client's saved instances,
//! tracks the active selection, and saves filled-in forms. Saved methods
//! are referenced, never duplicated - and only their masked fields ever
//! exist client-side.

mod forms;

pub use forms::PaymentForm;

use thiserror::Error;
use tracing::instrument;

use tienda_core::{EmailError, PaymentTemplateId, SavedMethodId};

use crate::api::types::GuardarMetodoPagoRequest;
use crate::api::{ApiClient, ApiError};
use crate::models::{PaymentKind, PaymentMethodTemplate, SavedPaymentMethod};
use crate::session::Session;

/// Errors surfaced by payment method operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No payment method is selected yet.
    #[error("no payment method selected")]
    NothingSelected,

    /// The referenced template is not in the loaded list.
    #[error("unknown payment method template: {0}")]
    UnknownTemplate(PaymentTemplateId),

    /// The referenced saved method is not in the loaded list.
    #[error("unknown saved payment method: {0}")]
    UnknownSavedMethod(SavedMethodId),

    /// Saving requires a non-empty alias.
    #[error("payment method alias cannot be empty")]
    MissingAlias,

    /// Saving requires a freshly filled form, not a saved method.
    #[error("no new payment form to save")]
    NoFormToSave,

    /// Card number failed brand detection or the Luhn check.
    #[error("invalid card number")]
    InvalidCardNumber,

    /// Expiration is malformed or in the past.
    #[error("invalid or past expiration date")]
    InvalidExpiration,

    /// CVV has the wrong length for the detected brand.
    #[error("invalid CVV")]
    InvalidCvv,

    /// Card holder name is empty.
    #[error("card holder name cannot be empty")]
    MissingHolderName,

    /// Bank transfer reference is empty.
    #[error("transfer reference cannot be empty")]
    MissingReference,

    /// Wallet email failed structural validation.
    #[error("invalid wallet email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Crypto wallet address is empty.
    #[error("wallet address cannot be empty")]
    MissingWalletAddress,

    /// Backend call failed; local state is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The active payment selection.
#[derive(Debug, Clone)]
pub enum PaymentSelection {
    /// A previously saved method, referenced by id.
    Saved(SavedMethodId),
    /// A new method being filled in against a template.
    New {
        template_id: PaymentTemplateId,
        form: PaymentForm,
    },
}

/// A validated selection, ready for the checkout review step.
#[derive(Debug, Clone)]
pub struct SelectedPayment {
    pub kind: PaymentKind,
    /// Masked description; never a raw card number or CVV.
    pub summary: String,
}

/// Payment method templates, saved instances and the current selection.
#[derive(Debug)]
pub struct PaymentSelector {
    api: ApiClient,
    templates: Vec<PaymentMethodTemplate>,
    saved: Vec<SavedPaymentMethod>,
    selection: Option<PaymentSelection>,
}

impl PaymentSelector {
    /// Create an empty selector; call [`PaymentSelector::refresh`] to
    /// load.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            templates: Vec::new(),
            saved: Vec::new(),
            selection: None,
        }
    }

    /// Templates offered for new methods, already filtered and ordered.
    #[must_use]
    pub fn templates(&self) -> &[PaymentMethodTemplate] {
        &self.templates
    }

    /// The client's saved methods.
    #[must_use]
    pub fn saved(&self) -> &[SavedPaymentMethod] {
        &self.saved
    }

    /// The active selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<&PaymentSelection> {
        self.selection.as_ref()
    }

    /// Load templates (kept to `active_online && visible`, sorted by
    /// display order) and the client's saved methods.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip(self, session))]
    pub async fn refresh(&mut self, session: &Session) -> Result<(), PaymentError> {
        let mut templates = self.api.payment_templates(session).await?;
        templates.retain(|t| t.active_online && t.visible);
        templates.sort_by_key(|t| t.display_order);
        self.templates = templates;
        self.saved = self.api.saved_methods(session).await?;
        Ok(())
    }

    /// Select a saved method.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::UnknownSavedMethod`] for an id not in the
    /// loaded list.
    pub fn select_saved(&mut self, id: SavedMethodId) -> Result<(), PaymentError> {
        if !self.saved.iter().any(|m| m.id == id) {
            return Err(PaymentError::UnknownSavedMethod(id));
        }
        self.selection = Some(PaymentSelection::Saved(id));
        Ok(())
    }

    /// Start a new method against a template, opening the type-specific
    /// empty form.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::UnknownTemplate`] for an id not in the
    /// loaded list.
    pub fn select_template(&mut self, id: PaymentTemplateId) -> Result<(), PaymentError> {
        let template = self
            .templates
            .iter()
            .find(|t| t.id == id)
            .ok_or(PaymentError::UnknownTemplate(id))?;

        self.selection = Some(PaymentSelection::New {
            template_id: id,
            form: PaymentForm::empty(template.kind),
        });
        Ok(())
    }

    /// Mutable access to the in-progress form, if the selection is a new
    /// method.
    pub fn form_mut(&mut self) -> Option<&mut PaymentForm> {
        match &mut self.selection {
            Some(PaymentSelection::New { form, .. }) => Some(form),
            _ => None,
        }
    }

    /// Validate the current selection for checkout.
    ///
    /// A saved method is complete by construction; a new form must pass
    /// its type-specific validation.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::NothingSelected`] with no selection, or the
    /// form's validation error.
    pub fn validated_selection(&self) -> Result<SelectedPayment, PaymentError> {
        match &self.selection {
            None => Err(PaymentError::NothingSelected),
            Some(PaymentSelection::Saved(id)) => {
                let method = self
                    .saved
                    .iter()
                    .find(|m| m.id == *id)
                    .ok_or(PaymentError::UnknownSavedMethod(*id))?;
                Ok(SelectedPayment {
                    kind: method.kind,
                    summary: method
                        .masked_detail
                        .clone()
                        .unwrap_or_else(|| method.alias.clone()),
                })
            }
            Some(PaymentSelection::New { form, .. }) => {
                form.validate()?;
                Ok(SelectedPayment {
                    kind: form.kind(),
                    summary: form.masked_summary(),
                })
            }
        }
    }

    /// Persist the in-progress form as a saved method.
    ///
    /// Requires a non-empty alias and a passing validation before any
    /// network call. On success the new method becomes the selection and
    /// the saved list is refreshed from the response.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MissingAlias`], [`PaymentError::NoFormToSave`]
    /// or a validation error before the network call, or an [`ApiError`]
    /// if the request fails.
    #[instrument(skip(self, session, alias))]
    pub async fn save(&mut self, session: &Session, alias: &str) -> Result<SavedMethodId, PaymentError> {
        if alias.trim().is_empty() {
            return Err(PaymentError::MissingAlias);
        }
        let Some(PaymentSelection::New { template_id, form }) = &self.selection else {
            return Err(PaymentError::NoFormToSave);
        };
        form.validate()?;

        let request = GuardarMetodoPagoRequest {
            alias: alias.trim().to_string(),
            id_metodo_pago: template_id.as_i32(),
            datos: form.to_datos(),
        };
        let saved = self.api.save_payment_method(session, &request).await?;
        let id = saved.id;

        self.saved = self.api.saved_methods(session).await?;
        // The freshly saved method may not be in the refreshed list if the
        // backend lags; keep it selectable either way
        if !self.saved.iter().any(|m| m.id == id) {
            self.saved.push(saved);
        }
        self.selection = Some(PaymentSelection::Saved(id));
        Ok(id)
    }

    #[cfg(test)]
    pub(crate) fn seed_for_tests(
        &mut self,
        templates: Vec<PaymentMethodTemplate>,
        saved: Vec<SavedPaymentMethod>,
    ) {
        self.templates = templates;
        self.saved = saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: i32, kind: PaymentKind, order: i32, online: bool, visible: bool) -> PaymentMethodTemplate {
        PaymentMethodTemplate {
            id: PaymentTemplateId::new(id),
            display_name: format!("method-{id}"),
            kind,
            icon_url: None,
            visible,
            active_online: online,
            display_order: order,
        }
    }

    fn saved_card(id: i32) -> SavedPaymentMethod {
        SavedPaymentMethod {
            id: SavedMethodId::new(id),
            alias: "personal".to_string(),
            template_id: PaymentTemplateId::new(1),
            kind: PaymentKind::Card,
            masked_detail: Some("****-****-****-1111".to_string()),
            verified: true,
            is_default: false,
        }
    }

    fn selector() -> PaymentSelector {
        let mut selector = PaymentSelector::new(ApiClient::new("http://localhost:0"));
        selector.templates = vec![
            template(1, PaymentKind::Card, 1, true, true),
            template(2, PaymentKind::Wallet, 2, true, true),
        ];
        selector.saved = vec![saved_card(10)];
        selector
    }

    #[test]
    fn test_select_template_opens_matching_form() {
        let mut selector = selector();
        selector.select_template(PaymentTemplateId::new(2)).expect("select");
        assert!(matches!(
            selector.selection(),
            Some(PaymentSelection::New { form: PaymentForm::Wallet { .. }, .. })
        ));
    }

    #[test]
    fn test_select_unknown_template() {
        let mut selector = selector();
        assert!(matches!(
            selector.select_template(PaymentTemplateId::new(99)),
            Err(PaymentError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_saved_selection_exposes_only_masked_detail() {
        let mut selector = selector();
        selector.select_saved(SavedMethodId::new(10)).expect("select");
        let selected = selector.validated_selection().expect("valid");
        assert_eq!(selected.summary, "****-****-****-1111");
        assert_eq!(selected.kind, PaymentKind::Card);
    }

    #[test]
    fn test_validated_selection_requires_selection() {
        let selector = selector();
        assert!(matches!(
            selector.validated_selection(),
            Err(PaymentError::NothingSelected)
        ));
    }

    #[test]
    fn test_incomplete_new_form_blocks_validation() {
        let mut selector = selector();
        selector.select_template(PaymentTemplateId::new(1)).expect("select");
        assert!(matches!(
            selector.validated_selection(),
            Err(PaymentError::InvalidCardNumber)
        ));
    }

    #[tokio::test]
    async fn test_save_requires_alias() {
        let mut selector = selector();
        selector.select_template(PaymentTemplateId::new(2)).expect("select");
        if let Some(PaymentForm::Wallet { email }) = selector.form_mut() {
            *email = "ana@example.com".to_string();
        }
        let err = selector
            .save(&Session::guest(), "  ")
            .await
            .expect_err("must reject");
        assert!(matches!(err, PaymentError::MissingAlias));
    }

    #[tokio::test]
    async fn test_save_requires_new_form() {
        let mut selector = selector();
        selector.select_saved(SavedMethodId::new(10)).expect("select");
        let err = selector
            .save(&Session::guest(), "personal")
            .await
            .expect_err("must reject");
        assert!(matches!(err, PaymentError::NoFormToSave));
    }
}
