//! Quotation builder.
//!
//! A quotation is a pre-sale price proposal, distinct from an order. The
//! header is created first (the backend assigns the id), then items are
//! appended against it, individually or in bulk. Totals are derived
//! locally from the item list; tax is zero in the current design.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use tienda_core::{ClientId, QuotationId, QuotationItemId};

use crate::api::types::{CotizacionItemRequest, CotizacionUpdateRequest};
use crate::api::{ApiClient, ApiError};
use crate::models::{Product, Quotation};
use crate::session::Session;

/// Errors surfaced by quotation operations.
#[derive(Debug, Error)]
pub enum QuotationError {
    /// Items were added before the header exists.
    #[error("no quotation loaded; create or load one first")]
    NoHeader,

    /// Item quantity must be at least 1.
    #[error("item quantity must be at least 1")]
    InvalidQuantity,

    /// Discount must be a percentage between 0 and 100.
    #[error("discount must be between 0 and 100 percent")]
    InvalidDiscount,

    /// The referenced item is not in the loaded quotation.
    #[error("unknown quotation item: {0}")]
    UnknownItem(QuotationItemId),

    /// Backend call failed; local state is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A line to append to a quotation, priced from the catalog product.
#[derive(Debug, Clone)]
pub struct QuotationItemDraft {
    pub product: Product,
    pub quantity: u32,
    pub discount_percent: Decimal,
}

/// Builds one quotation at a time against the backend.
#[derive(Debug)]
pub struct QuotationBuilder {
    api: ApiClient,
    quotation: Option<Quotation>,
}

impl QuotationBuilder {
    /// Create a builder with no quotation loaded.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            quotation: None,
        }
    }

    /// The currently loaded quotation, if any.
    #[must_use]
    pub const fn quotation(&self) -> Option<&Quotation> {
        self.quotation.as_ref()
    }

    /// Create a new quotation header and make it the loaded one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, notes))]
    pub async fn create(
        &mut self,
        session: &Session,
        client_id: ClientId,
        expiration_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<QuotationId, QuotationError> {
        let quotation = self
            .api
            .create_quotation(session, client_id, expiration_date, notes)
            .await?;
        let id = quotation.id;
        self.quotation = Some(quotation);
        Ok(id)
    }

    /// Load an existing quotation with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn load(&mut self, session: &Session, id: QuotationId) -> Result<(), QuotationError> {
        self.quotation = Some(self.api.get_quotation(session, id).await?);
        Ok(())
    }

    /// List all quotations for the logged-in client.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn list(&self, session: &Session) -> Result<Vec<Quotation>, QuotationError> {
        Ok(self.api.list_quotations(session).await?)
    }

    /// Append one item to the loaded quotation.
    ///
    /// The unit price is captured from the product at add time; later
    /// catalog price changes do not alter the quotation.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any network call, or an
    /// [`ApiError`] if the request fails.
    #[instrument(skip(self, session, draft))]
    pub async fn add_item(
        &mut self,
        session: &Session,
        draft: &QuotationItemDraft,
    ) -> Result<(), QuotationError> {
        validate_draft(draft)?;
        let id = self.loaded_id()?;
        let item = self
            .api
            .add_quotation_item(session, id, &item_request(draft))
            .await?;
        if let Some(quotation) = &mut self.quotation {
            quotation.items.push(item);
        }
        Ok(())
    }

    /// Append several items in one request.
    ///
    /// All drafts are validated before anything is sent; the backend
    /// appends the batch atomically.
    ///
    /// # Errors
    ///
    /// Returns the first draft's validation error before any network call,
    /// or an [`ApiError`] if the request fails.
    #[instrument(skip(self, session, drafts))]
    pub async fn add_items(
        &mut self,
        session: &Session,
        drafts: &[QuotationItemDraft],
    ) -> Result<(), QuotationError> {
        for draft in drafts {
            validate_draft(draft)?;
        }
        let id = self.loaded_id()?;
        let requests: Vec<CotizacionItemRequest> = drafts.iter().map(item_request).collect();
        let items = self.api.add_quotation_items(session, id, &requests).await?;
        if let Some(quotation) = &mut self.quotation {
            quotation.items.extend(items);
        }
        Ok(())
    }

    /// Remove an item from the loaded quotation.
    ///
    /// # Errors
    ///
    /// Returns [`QuotationError::UnknownItem`] for an id not in the loaded
    /// items, or an [`ApiError`] if the request fails.
    #[instrument(skip(self, session))]
    pub async fn remove_item(
        &mut self,
        session: &Session,
        item_id: QuotationItemId,
    ) -> Result<(), QuotationError> {
        let id = self.loaded_id()?;
        let known = self
            .quotation
            .as_ref()
            .is_some_and(|q| q.items.iter().any(|i| i.id == item_id));
        if !known {
            return Err(QuotationError::UnknownItem(item_id));
        }

        self.api.remove_quotation_item(session, id, item_id).await?;
        if let Some(quotation) = &mut self.quotation {
            quotation.items.retain(|i| i.id != item_id);
        }
        Ok(())
    }

    /// Update the loaded quotation's notes and/or expiration date.
    ///
    /// # Errors
    ///
    /// Returns [`QuotationError::NoHeader`] with nothing loaded, or an
    /// [`ApiError`] if the request fails.
    #[instrument(skip(self, session, notes))]
    pub async fn update_header(
        &mut self,
        session: &Session,
        notes: Option<String>,
        expiration_date: Option<NaiveDate>,
    ) -> Result<(), QuotationError> {
        let id = self.loaded_id()?;
        let request = CotizacionUpdateRequest {
            notas: notes,
            fecha_expiracion: expiration_date,
        };
        let updated = self.api.update_quotation(session, id, &request).await?;
        self.quotation = Some(updated);
        Ok(())
    }

    /// Delete the loaded quotation and clear it.
    ///
    /// # Errors
    ///
    /// Returns [`QuotationError::NoHeader`] with nothing loaded, or an
    /// [`ApiError`] if the request fails.
    #[instrument(skip(self, session))]
    pub async fn delete(&mut self, session: &Session) -> Result<(), QuotationError> {
        let id = self.loaded_id()?;
        self.api.delete_quotation(session, id).await?;
        self.quotation = None;
        Ok(())
    }

    fn loaded_id(&self) -> Result<QuotationId, QuotationError> {
        self.quotation
            .as_ref()
            .map(|q| q.id)
            .ok_or(QuotationError::NoHeader)
    }
}

fn validate_draft(draft: &QuotationItemDraft) -> Result<(), QuotationError> {
    if draft.quantity == 0 {
        return Err(QuotationError::InvalidQuantity);
    }
    if draft.discount_percent < Decimal::ZERO || draft.discount_percent > Decimal::from(100) {
        return Err(QuotationError::InvalidDiscount);
    }
    Ok(())
}

fn item_request(draft: &QuotationItemDraft) -> CotizacionItemRequest {
    CotizacionItemRequest {
        id_producto: draft.product.id.as_i32(),
        cantidad: draft.quantity,
        precio_unitario: draft.product.unit_price.amount(),
        descuento_porcentaje: draft.discount_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tienda_core::{Money, ProductId, QuotationStatus};

    fn product() -> Product {
        Product {
            id: ProductId::new(7),
            name: "Taladro".to_string(),
            description: None,
            unit_price: Money::from_major(20),
            stock: 10,
            category_id: None,
            image_url: None,
        }
    }

    fn draft(quantity: u32, discount: Decimal) -> QuotationItemDraft {
        QuotationItemDraft {
            product: product(),
            quantity,
            discount_percent: discount,
        }
    }

    fn builder_with_header() -> QuotationBuilder {
        let mut builder = QuotationBuilder::new(ApiClient::new("http://localhost:0"));
        builder.quotation = Some(Quotation {
            id: QuotationId::new(5),
            client_id: ClientId::new(9),
            expiration_date: NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
            notes: None,
            status: QuotationStatus::Draft,
            items: Vec::new(),
        });
        builder
    }

    #[test]
    fn test_validate_draft_bounds() {
        assert!(matches!(
            validate_draft(&draft(0, Decimal::ZERO)),
            Err(QuotationError::InvalidQuantity)
        ));
        assert!(matches!(
            validate_draft(&draft(1, dec!(101))),
            Err(QuotationError::InvalidDiscount)
        ));
        assert!(matches!(
            validate_draft(&draft(1, dec!(-1))),
            Err(QuotationError::InvalidDiscount)
        ));
        assert!(validate_draft(&draft(1, dec!(100))).is_ok());
    }

    #[test]
    fn test_item_request_captures_catalog_price() {
        let request = item_request(&draft(3, dec!(10)));
        assert_eq!(request.id_producto, 7);
        assert_eq!(request.cantidad, 3);
        assert_eq!(request.precio_unitario, dec!(20));
        assert_eq!(request.descuento_porcentaje, dec!(10));
    }

    #[tokio::test]
    async fn test_add_item_requires_header() {
        let mut builder = QuotationBuilder::new(ApiClient::new("http://localhost:0"));
        let err = builder
            .add_item(&Session::guest(), &draft(1, Decimal::ZERO))
            .await
            .expect_err("must reject");
        assert!(matches!(err, QuotationError::NoHeader));
    }

    #[tokio::test]
    async fn test_add_item_validates_before_network() {
        let mut builder = builder_with_header();
        let err = builder
            .add_item(&Session::guest(), &draft(0, Decimal::ZERO))
            .await
            .expect_err("must reject");
        assert!(matches!(err, QuotationError::InvalidQuantity));
    }

    #[tokio::test]
    async fn test_bulk_validates_every_draft_first() {
        let mut builder = builder_with_header();
        let drafts = vec![draft(1, Decimal::ZERO), draft(2, dec!(200))];
        let err = builder
            .add_items(&Session::guest(), &drafts)
            .await
            .expect_err("must reject");
        assert!(matches!(err, QuotationError::InvalidDiscount));
        assert!(builder.quotation().is_some_and(|q| q.items.is_empty()));
    }

    #[tokio::test]
    async fn test_remove_unknown_item() {
        let mut builder = builder_with_header();
        let err = builder
            .remove_item(&Session::guest(), QuotationItemId::new(42))
            .await
            .expect_err("must reject");
        assert!(matches!(err, QuotationError::UnknownItem(_)));
    }
}
