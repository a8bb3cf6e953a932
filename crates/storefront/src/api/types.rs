//! Raw wire types for the Tienda REST backend.
//!
//! Field names mirror the backend's Spanish JSON keys exactly. These types
//! never leave the `api` module: [`super::conversions`] maps them into the
//! canonical entities of [`crate::models`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tienda_core::{CashDeliveryKind, OrderStatus, PaymentStatus, QuotationStatus};

/// Response envelope every endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// Flat auth payload: token plus the client's own fields.
#[derive(Debug, Deserialize)]
pub struct AuthDataDto {
    pub token: String,
    pub id: i32,
    pub nombre: String,
    pub email: String,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductoDto {
    pub id: i32,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub stock: u32,
    #[serde(default)]
    pub id_categoria: Option<i32>,
    #[serde(default)]
    pub imagen_url: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CarritoItemDto {
    pub id: i32,
    pub id_producto: i32,
    pub nombre: String,
    pub precio_unitario: Decimal,
    pub cantidad: u32,
    pub stock: u32,
    #[serde(default)]
    pub imagen_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CarritoCreateRequest {
    pub id_producto: i32,
    pub cantidad: u32,
}

#[derive(Debug, Serialize)]
pub struct CarritoUpdateRequest {
    pub cantidad: u32,
}

// =============================================================================
// Addresses
// =============================================================================

/// Address record as returned by the backend.
///
/// Different endpoints key the identifier differently (`id`,
/// `id_direccion`, `direccion_id`); all three spellings are accepted here
/// and resolved once in the conversion layer.
#[derive(Debug, Deserialize)]
pub struct DireccionDto {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub id_direccion: Option<i32>,
    #[serde(default)]
    pub direccion_id: Option<i32>,
    pub calle: String,
    pub ciudad: String,
    pub estado: String,
    pub codigo_postal: String,
    pub pais: String,
    #[serde(default)]
    pub es_principal: bool,
}

#[derive(Debug, Serialize)]
pub struct DireccionRequest {
    pub calle: String,
    pub ciudad: String,
    pub estado: String,
    pub codigo_postal: String,
    pub pais: String,
    pub es_principal: bool,
}

// =============================================================================
// Payment methods
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MetodoPagoDto {
    pub id: i32,
    pub nombre: String,
    pub tipo: String,
    #[serde(default)]
    pub icono_url: Option<String>,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub activo_online: bool,
    #[serde(default)]
    pub orden: i32,
}

#[derive(Debug, Deserialize)]
pub struct MetodoPagoClienteDto {
    pub id: i32,
    pub alias: String,
    pub id_metodo_pago: i32,
    pub tipo: String,
    /// Masked display detail, e.g. the last four card digits.
    #[serde(default)]
    pub detalle_enmascarado: Option<String>,
    #[serde(default)]
    pub verificado: bool,
    #[serde(default)]
    pub es_predeterminado: bool,
}

/// Type-specific fields of a payment method being saved.
///
/// Tagged by `tipo` on the wire; the variants carry exactly the field set
/// the backend expects for each kind.
#[derive(Debug, Serialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum DatosMetodoPago {
    Card {
        numero: String,
        expiracion: String,
        cvv: String,
        titular: String,
    },
    BankTransfer {
        referencia: String,
    },
    Wallet {
        correo: String,
    },
    Cash {
        entrega: CashDeliveryKind,
    },
    Crypto {
        direccion_wallet: String,
    },
}

#[derive(Debug, Serialize)]
pub struct GuardarMetodoPagoRequest {
    pub alias: String,
    pub id_metodo_pago: i32,
    #[serde(flatten)]
    pub datos: DatosMetodoPago,
}

// =============================================================================
// Orders & payments
// =============================================================================

#[derive(Debug, Serialize)]
pub struct OrdenRequest {
    pub id_direccion_envio: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrdenDto {
    pub id: i32,
    pub id_direccion_envio: i32,
    pub total: Decimal,
    #[serde(default)]
    pub estado: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct PagoRequest {
    pub metodo_pago: String,
    pub monto: Decimal,
    pub estado: PaymentStatus,
    pub id_transaccion: String,
}

#[derive(Debug, Deserialize)]
pub struct PagoDto {
    pub id_orden: i32,
    pub monto: Decimal,
    #[serde(default)]
    pub estado: PaymentStatus,
    pub id_transaccion: String,
}

// =============================================================================
// Quotations
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CotizacionRequest {
    pub id_cliente: i32,
    pub fecha_expiracion: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CotizacionUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_expiracion: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CotizacionDto {
    pub id: i32,
    pub id_cliente: i32,
    pub fecha_expiracion: NaiveDate,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub estado: QuotationStatus,
    #[serde(default)]
    pub items: Vec<CotizacionItemDto>,
}

#[derive(Debug, Serialize)]
pub struct CotizacionItemRequest {
    pub id_producto: i32,
    pub cantidad: u32,
    pub precio_unitario: Decimal,
    pub descuento_porcentaje: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CotizacionItemDto {
    pub id: i32,
    pub id_producto: i32,
    pub cantidad: u32,
    pub precio_unitario: Decimal,
    #[serde(default)]
    pub descuento_porcentaje: Decimal,
}
