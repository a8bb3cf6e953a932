//! Shipping address book.
//!
//! CRUD over the client's addresses plus the checkout-facing selection.
//! The "at most one primary" invariant is enforced server-side; the client
//! only toggles the flag and reflects what comes back.

use thiserror::Error;
use tracing::instrument;

use tienda_core::AddressId;

use crate::api::{ApiClient, ApiError};
use crate::models::{Address, AddressForm};
use crate::session::Session;

/// Errors surfaced by address operations.
#[derive(Debug, Error)]
pub enum AddressError {
    /// A required form field is empty.
    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    /// The referenced address is not in the book.
    #[error("unknown address: {0}")]
    UnknownAddress(AddressId),

    /// Deletion was attempted without explicit confirmation.
    #[error("address deletion requires confirmation")]
    NotConfirmed,

    /// Backend call failed; local state is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The client's addresses and the current checkout selection.
#[derive(Debug)]
pub struct AddressBook {
    api: ApiClient,
    addresses: Vec<Address>,
    selected: Option<AddressId>,
}

impl AddressBook {
    /// Create an empty book; call [`AddressBook::refresh`] to load.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            addresses: Vec::new(),
            selected: None,
        }
    }

    /// All known addresses.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The currently selected address id, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<AddressId> {
        self.selected
    }

    /// The currently selected address record.
    #[must_use]
    pub fn selected_address(&self) -> Option<&Address> {
        self.selected
            .and_then(|id| self.addresses.iter().find(|a| a.id == id))
    }

    /// Fetch all addresses for the logged-in client.
    ///
    /// A primary-flagged address becomes the default selection; no address
    /// is auto-selected otherwise (explicit user action required). Any
    /// prior selection is reset, since its id may no longer exist in the
    /// refreshed list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn refresh(&mut self, session: &Session) -> Result<(), AddressError> {
        self.addresses = self.api.list_addresses(session).await?;
        self.selected = self
            .addresses
            .iter()
            .find(|a| a.is_primary)
            .map(|a| a.id);
        Ok(())
    }

    /// Select an address for checkout.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnknownAddress`] if the id is not in the
    /// book.
    pub fn select(&mut self, id: AddressId) -> Result<(), AddressError> {
        if !self.addresses.iter().any(|a| a.id == id) {
            return Err(AddressError::UnknownAddress(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Create an address from a validated form.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] before any network call if a
    /// required field is empty, or an [`ApiError`] if the request fails.
    #[instrument(skip(self, session, form))]
    pub async fn create(
        &mut self,
        session: &Session,
        form: &AddressForm,
    ) -> Result<AddressId, AddressError> {
        validate_form(form)?;
        let address = self.api.create_address(session, form).await?;
        let id = address.id;
        self.addresses.push(address);
        Ok(id)
    }

    /// Update an existing address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] before any network call if a
    /// required field is empty, [`AddressError::UnknownAddress`] if the id
    /// is not in the book, or an [`ApiError`] if the request fails.
    #[instrument(skip(self, session, form))]
    pub async fn update(
        &mut self,
        session: &Session,
        id: AddressId,
        form: &AddressForm,
    ) -> Result<(), AddressError> {
        validate_form(form)?;
        if !self.addresses.iter().any(|a| a.id == id) {
            return Err(AddressError::UnknownAddress(id));
        }

        let updated = self.api.update_address(session, id, form).await?;
        if let Some(slot) = self.addresses.iter_mut().find(|a| a.id == id) {
            *slot = updated;
        }
        Ok(())
    }

    /// Delete an address.
    ///
    /// The destructive call fires only with `confirmed` set - the caller
    /// must have asked the user first.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotConfirmed`] without network traffic when
    /// `confirmed` is false, [`AddressError::UnknownAddress`] for an id
    /// not in the book, or an [`ApiError`] if the request fails.
    #[instrument(skip(self, session))]
    pub async fn delete(
        &mut self,
        session: &Session,
        id: AddressId,
        confirmed: bool,
    ) -> Result<(), AddressError> {
        if !confirmed {
            return Err(AddressError::NotConfirmed);
        }
        if !self.addresses.iter().any(|a| a.id == id) {
            return Err(AddressError::UnknownAddress(id));
        }

        self.api.delete_address(session, id).await?;
        self.addresses.retain(|a| a.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn seed_for_tests(&mut self, addresses: Vec<Address>, selected: Option<AddressId>) {
        self.addresses = addresses;
        self.selected = selected;
    }
}

/// Require `street, city, state, postal_code, country` to be non-empty.
fn validate_form(form: &AddressForm) -> Result<(), AddressError> {
    let required: [(&'static str, &str); 5] = [
        ("street", &form.street),
        ("city", &form.city),
        ("state", &form.state),
        ("postal_code", &form.postal_code),
        ("country", &form.country),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(AddressError::MissingField(name));
        }
    }
    Ok(())
}
