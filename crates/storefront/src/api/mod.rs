//! REST client for the Tienda backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth - cart mutations return the full
//!   updated cart, and local state is replaced from that response
//! - Every response body is wrapped in a `{success, message, data}`
//!   envelope; [`ApiError`] derives a human-readable message by preferring
//!   the server-supplied `message`, then a generic status-code message
//! - Raw wire shapes live in [`types`] and are normalized once in
//!   [`conversions`]; only canonical [`crate::models`] entities leave this
//!   module
//!
//! # Example
//!
//! ```rust,ignore
//! use tienda_storefront::api::ApiClient;
//! use tienda_storefront::session::Session;
//!
//! let api = ApiClient::new("https://api.example.com");
//! let session = api.login("ana@example.com", "hunter2good").await?;
//! let cart = api.get_cart(&session).await?;
//! ```

pub mod conversions;
pub mod types;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use tienda_core::{
    AddressId, CartLineId, ClientId, OrderId, ProductId, QuotationId, QuotationItemId,
};

use crate::config::StorefrontConfig;
use crate::models::{
    Address, CartLine, Order, PaymentMethodTemplate, PaymentReceipt, Product, Quotation,
    QuotationItem, SavedPaymentMethod,
};
use crate::session::Session;

use conversions::{
    convert_address, convert_auth, convert_cart_line, convert_order, convert_payment,
    convert_product, convert_quotation, convert_quotation_item, convert_saved_method,
    convert_template,
};
use types::{
    CarritoCreateRequest, CarritoItemDto, CarritoUpdateRequest, CotizacionDto,
    CotizacionItemDto, CotizacionItemRequest, CotizacionRequest, CotizacionUpdateRequest,
    DireccionDto, DireccionRequest, Envelope, GuardarMetodoPagoRequest, LoginRequest,
    MetodoPagoClienteDto, MetodoPagoDto, OrdenDto, OrdenRequest, PagoDto, PagoRequest,
    ProductoDto, RegisterRequest,
};

/// Errors that can occur when talking to the Tienda backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never completed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status code.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Backend answered 2xx but flagged the request as unsuccessful.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response decoded but violates the backend contract.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Derive a human-readable message for a failed response: prefer the
/// server-supplied `message` field, fall back to the generic status-code
/// phrase, fall back to "unknown error".
fn derive_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("message").and_then(|m| m.as_str())
        && !message.is_empty()
    {
        return message.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

/// Client for the Tienda REST API.
///
/// Cheap to clone; all components share one underlying `reqwest` client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client against the given backend base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client from configuration, applying the request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_base_url.as_str()))
    }

    fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        }
    }

    fn request(&self, method: Method, path: &str, session: &Session) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let mut builder = self.inner.client.request(method, url);
        // Guest sessions carry no token; read-only endpoints tolerate that
        if let Some(token) = session.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and unwrap the response envelope's `data`.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let envelope = self.execute_envelope::<T>(builder).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::Malformed("response envelope has no data".to_string()))
    }

    /// Send a request where no `data` payload is expected back.
    async fn execute_empty(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        self.execute_envelope::<serde_json::Value>(builder).await?;
        Ok(())
    }

    async fn execute_envelope<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = derive_error_message(status, &text);
            tracing::warn!(status = %status, message = %message, "backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            ApiError::Parse(e)
        })?;

        if !envelope.success {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(envelope)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path, session)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path, session).json(body))
            .await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::PUT, path, session).json(body))
            .await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in and build an authenticated session from the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request
    /// fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let data = self
            .execute(
                self.request(Method::POST, "/auth/login", &Session::guest())
                    .json(&body),
            )
            .await?;
        let (token, profile) = convert_auth(data);
        Ok(Session::authenticated(token, profile))
    }

    /// Register a new client account and return the authenticated session.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        let body = RegisterRequest {
            nombre: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let data = self
            .execute(
                self.request(Method::POST, "/auth/register", &Session::guest())
                    .json(&body),
            )
            .await?;
        let (token, profile) = convert_auth(data);
        Ok(Session::authenticated(token, profile))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the full product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn list_products(&self, session: &Session) -> Result<Vec<Product>, ApiError> {
        let dtos: Vec<ProductoDto> = self.get("/productos", session).await?;
        Ok(dtos.into_iter().map(convert_product).collect())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the client's active cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn get_cart(&self, session: &Session) -> Result<Vec<CartLine>, ApiError> {
        let dtos: Vec<CarritoItemDto> = self.get("/carrito", session).await?;
        Ok(dtos.into_iter().map(convert_cart_line).collect())
    }

    /// Create a cart line; the response is the full updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn add_cart_line(
        &self,
        session: &Session,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError> {
        let body = CarritoCreateRequest {
            id_producto: product_id.as_i32(),
            cantidad: quantity,
        };
        let dtos: Vec<CarritoItemDto> = self.post("/carrito", session, &body).await?;
        Ok(dtos.into_iter().map(convert_cart_line).collect())
    }

    /// Update a cart line's quantity, keyed by the server-assigned line id;
    /// the response is the full updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn update_cart_line(
        &self,
        session: &Session,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError> {
        let body = CarritoUpdateRequest { cantidad: quantity };
        let dtos: Vec<CarritoItemDto> = self
            .put(&format!("/carrito/{line_id}"), session, &body)
            .await?;
        Ok(dtos.into_iter().map(convert_cart_line).collect())
    }

    /// Delete a cart line; the response is the full updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn delete_cart_line(
        &self,
        session: &Session,
        line_id: CartLineId,
    ) -> Result<Vec<CartLine>, ApiError> {
        let dtos: Vec<CarritoItemDto> = self
            .execute(self.request(Method::DELETE, &format!("/carrito/{line_id}"), session))
            .await?;
        Ok(dtos.into_iter().map(convert_cart_line).collect())
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Fetch all addresses for the logged-in client.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a record cannot be
    /// normalized.
    #[instrument(skip(self, session))]
    pub async fn list_addresses(&self, session: &Session) -> Result<Vec<Address>, ApiError> {
        let dtos: Vec<DireccionDto> = self.get("/direcciones", session).await?;
        dtos.into_iter().map(convert_address).collect()
    }

    /// Create an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, form))]
    pub async fn create_address(
        &self,
        session: &Session,
        form: &crate::models::AddressForm,
    ) -> Result<Address, ApiError> {
        let body = direccion_request(form);
        let dto: DireccionDto = self.post("/direcciones", session, &body).await?;
        convert_address(dto)
    }

    /// Update an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, form))]
    pub async fn update_address(
        &self,
        session: &Session,
        id: AddressId,
        form: &crate::models::AddressForm,
    ) -> Result<Address, ApiError> {
        let body = direccion_request(form);
        let dto: DireccionDto = self
            .put(&format!("/direcciones/{id}"), session, &body)
            .await?;
        convert_address(dto)
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn delete_address(&self, session: &Session, id: AddressId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/direcciones/{id}"), session))
            .await
    }

    // =========================================================================
    // Payment methods
    // =========================================================================

    /// Fetch the global payment method templates available online.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a template carries an
    /// unknown kind.
    #[instrument(skip(self, session))]
    pub async fn payment_templates(
        &self,
        session: &Session,
    ) -> Result<Vec<PaymentMethodTemplate>, ApiError> {
        let dtos: Vec<MetodoPagoDto> = self.get("/metodos-pago/online", session).await?;
        dtos.into_iter().map(convert_template).collect()
    }

    /// Fetch the client's saved payment methods.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn saved_methods(
        &self,
        session: &Session,
    ) -> Result<Vec<SavedPaymentMethod>, ApiError> {
        let dtos: Vec<MetodoPagoClienteDto> = self.get("/metodos-pago-cliente", session).await?;
        dtos.into_iter().map(convert_saved_method).collect()
    }

    /// Persist a filled-in payment form as a saved method.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, request))]
    pub async fn save_payment_method(
        &self,
        session: &Session,
        request: &GuardarMetodoPagoRequest,
    ) -> Result<SavedPaymentMethod, ApiError> {
        let dto: MetodoPagoClienteDto = self
            .post("/metodos-pago-cliente", session, request)
            .await?;
        convert_saved_method(dto)
    }

    // =========================================================================
    // Orders & payments
    // =========================================================================

    /// Create an order referencing the selected shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, notes))]
    pub async fn create_order(
        &self,
        session: &Session,
        shipping_address_id: AddressId,
        notes: Option<String>,
    ) -> Result<Order, ApiError> {
        let body = OrdenRequest {
            id_direccion_envio: shipping_address_id.as_i32(),
            notas: notes,
        };
        let dto: OrdenDto = self.post("/ordenes", session, &body).await?;
        Ok(convert_order(dto))
    }

    /// Process a payment against an existing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, request))]
    pub async fn process_payment(
        &self,
        session: &Session,
        order_id: OrderId,
        request: &PagoRequest,
    ) -> Result<PaymentReceipt, ApiError> {
        let dto: PagoDto = self
            .post(&format!("/ordenes/{order_id}/pagos"), session, request)
            .await?;
        Ok(convert_payment(dto))
    }

    // =========================================================================
    // Quotations
    // =========================================================================

    /// Create a quotation header; the backend assigns the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, notes))]
    pub async fn create_quotation(
        &self,
        session: &Session,
        client_id: ClientId,
        expiration_date: chrono::NaiveDate,
        notes: Option<String>,
    ) -> Result<Quotation, ApiError> {
        let body = CotizacionRequest {
            id_cliente: client_id.as_i32(),
            fecha_expiracion: expiration_date,
            notas: notes,
        };
        let dto: CotizacionDto = self.post("/cotizaciones", session, &body).await?;
        Ok(convert_quotation(dto))
    }

    /// Fetch all quotations for the logged-in client.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn list_quotations(&self, session: &Session) -> Result<Vec<Quotation>, ApiError> {
        let dtos: Vec<CotizacionDto> = self.get("/cotizaciones", session).await?;
        Ok(dtos.into_iter().map(convert_quotation).collect())
    }

    /// Fetch a quotation with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn get_quotation(
        &self,
        session: &Session,
        id: QuotationId,
    ) -> Result<Quotation, ApiError> {
        let dto: CotizacionDto = self.get(&format!("/cotizaciones/{id}"), session).await?;
        Ok(convert_quotation(dto))
    }

    /// Update a quotation header (notes, expiration).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, request))]
    pub async fn update_quotation(
        &self,
        session: &Session,
        id: QuotationId,
        request: &CotizacionUpdateRequest,
    ) -> Result<Quotation, ApiError> {
        let dto: CotizacionDto = self
            .put(&format!("/cotizaciones/{id}"), session, request)
            .await?;
        Ok(convert_quotation(dto))
    }

    /// Delete a quotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn delete_quotation(&self, session: &Session, id: QuotationId) -> Result<(), ApiError> {
        self.execute_empty(self.request(Method::DELETE, &format!("/cotizaciones/{id}"), session))
            .await
    }

    /// Append one item to a quotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, item))]
    pub async fn add_quotation_item(
        &self,
        session: &Session,
        id: QuotationId,
        item: &CotizacionItemRequest,
    ) -> Result<QuotationItem, ApiError> {
        let dto: CotizacionItemDto = self
            .post(&format!("/cotizaciones/{id}/items"), session, item)
            .await?;
        Ok(convert_quotation_item(dto))
    }

    /// Append items in bulk to a quotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session, items))]
    pub async fn add_quotation_items(
        &self,
        session: &Session,
        id: QuotationId,
        items: &[CotizacionItemRequest],
    ) -> Result<Vec<QuotationItem>, ApiError> {
        let dtos: Vec<CotizacionItemDto> = self
            .post(&format!("/cotizaciones/{id}/items/bulk"), session, &items)
            .await?;
        Ok(dtos.into_iter().map(convert_quotation_item).collect())
    }

    /// Remove one item from a quotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn remove_quotation_item(
        &self,
        session: &Session,
        id: QuotationId,
        item_id: QuotationItemId,
    ) -> Result<(), ApiError> {
        self.execute_empty(self.request(
            Method::DELETE,
            &format!("/cotizaciones/{id}/items/{item_id}"),
            session,
        ))
        .await
    }
}

fn direccion_request(form: &crate::models::AddressForm) -> DireccionRequest {
    DireccionRequest {
        calle: form.street.clone(),
        ciudad: form.city.clone(),
        estado: form.state.clone(),
        codigo_postal: form.postal_code.clone(),
        pais: form.country.clone(),
        es_principal: form.is_primary,
    }
}
