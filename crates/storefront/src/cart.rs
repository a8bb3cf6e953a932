//! Server-synchronized cart store.
//!
//! Every mutation is a network round trip keyed by the server-assigned
//! line id, and local state is replaced only from the server's response -
//! the server stays authoritative for stock and computed fields. Failed
//! validations are rejected before any network call, and failed requests
//! leave local state untouched.

use thiserror::Error;
use tracing::instrument;

use tienda_core::{Money, ProductId};

use crate::api::{ApiClient, ApiError};
use crate::models::{CartLine, Product};
use crate::session::Session;

/// Errors surfaced by cart mutations.
///
/// The display strings double as the user-facing alert messages.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product has no line in the cart.
    #[error("product {0} is not in the cart")]
    UnknownProduct(ProductId),

    /// A new line was requested for a product with zero stock.
    #[error("\"{name}\" is out of stock")]
    OutOfStock { name: String },

    /// The requested quantity exceeds the known stock.
    #[error("insufficient stock for \"{name}\": only {available} available")]
    InsufficientStock { name: String, available: u32 },

    /// Backend call failed; local state is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// In-memory representation of the client's cart, synchronized with the
/// remote cart resource.
#[derive(Debug)]
pub struct CartStore {
    api: ApiClient,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Create an empty store; call [`CartStore::refresh`] to load the
    /// server-side cart.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            lines: Vec::new(),
        }
    }

    /// Current cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Cart total at server-confirmed unit prices.
    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::total).sum()
    }

    fn line_for(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Replace local lines with the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; local state is unchanged.
    #[instrument(skip(self, session))]
    pub async fn refresh(&mut self, session: &Session) -> Result<(), CartError> {
        self.lines = self.api.get_cart(session).await?;
        Ok(())
    }

    /// Add one unit of a product.
    ///
    /// An existing line is incremented by 1 after checking the product's
    /// stock; otherwise a new remote line with quantity 1 is created,
    /// provided the product has stock at all. Either way the local lines
    /// are replaced from the server's response.
    ///
    /// # Errors
    ///
    /// Returns a stock error before any network call when the increment
    /// would exceed `product.stock`, or an [`ApiError`] if the remote
    /// mutation fails.
    #[instrument(skip(self, session, product), fields(product_id = %product.id))]
    pub async fn add_item(
        &mut self,
        session: &Session,
        product: &Product,
    ) -> Result<(), CartError> {
        match self.line_for(product.id) {
            Some(line) => {
                let new_quantity = line.quantity + 1;
                if new_quantity > product.stock {
                    return Err(CartError::InsufficientStock {
                        name: product.name.clone(),
                        available: product.stock,
                    });
                }
                let line_id = line.line_id;
                self.lines = self
                    .api
                    .update_cart_line(session, line_id, new_quantity)
                    .await?;
            }
            None => {
                if product.stock == 0 {
                    return Err(CartError::OutOfStock {
                        name: product.name.clone(),
                    });
                }
                self.lines = self.api.add_cart_line(session, product.id, 1).await?;
            }
        }
        Ok(())
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero delegates to [`CartStore::remove_item`]. The new
    /// quantity is validated against the line's known stock before the
    /// remote update; the local line reflects the change only after the
    /// server acknowledges it.
    ///
    /// # Errors
    ///
    /// Returns a stock error before any network call when `quantity`
    /// exceeds the known stock, or an [`ApiError`] if the remote mutation
    /// fails.
    #[instrument(skip(self, session))]
    pub async fn update_quantity(
        &mut self,
        session: &Session,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(session, product_id).await;
        }

        let line = self
            .line_for(product_id)
            .ok_or(CartError::UnknownProduct(product_id))?;

        if quantity > line.available_stock {
            return Err(CartError::InsufficientStock {
                name: line.name.clone(),
                available: line.available_stock,
            });
        }

        let line_id = line.line_id;
        self.lines = self.api.update_cart_line(session, line_id, quantity).await?;
        Ok(())
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if no line exists, or an
    /// [`ApiError`] if the remote delete fails.
    #[instrument(skip(self, session))]
    pub async fn remove_item(
        &mut self,
        session: &Session,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        let line = self
            .line_for(product_id)
            .ok_or(CartError::UnknownProduct(product_id))?;

        let line_id = line.line_id;
        self.lines = self.api.delete_cart_line(session, line_id).await?;
        Ok(())
    }
}
