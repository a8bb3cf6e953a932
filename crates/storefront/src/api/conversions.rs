//! Conversion of raw wire types into canonical domain entities.
//!
//! This is the single normalization boundary: every backend response is
//! mapped here before it enters component state, so quirks like the
//! inconsistent address identifier spelling never leak into the UI-facing
//! layers.

use tienda_core::{
    AddressId, CartLineId, CategoryId, ClientId, Money, OrderId, PaymentTemplateId, ProductId,
    QuotationId, QuotationItemId, SavedMethodId,
};

use super::ApiError;
use super::types::{
    AuthDataDto, CarritoItemDto, CotizacionDto, CotizacionItemDto, DireccionDto,
    MetodoPagoClienteDto, MetodoPagoDto, OrdenDto, PagoDto, ProductoDto,
};
use crate::models::{
    Address, CartLine, ClientProfile, Order, PaymentKind, PaymentMethodTemplate, PaymentReceipt,
    Product, Quotation, QuotationItem, SavedPaymentMethod,
};

pub fn convert_product(dto: ProductoDto) -> Product {
    Product {
        id: ProductId::new(dto.id),
        name: dto.nombre,
        description: dto.descripcion,
        unit_price: Money::new(dto.precio),
        stock: dto.stock,
        category_id: dto.id_categoria.map(CategoryId::new),
        image_url: dto.imagen_url,
    }
}

pub fn convert_cart_line(dto: CarritoItemDto) -> CartLine {
    CartLine {
        line_id: CartLineId::new(dto.id),
        product_id: ProductId::new(dto.id_producto),
        name: dto.nombre,
        unit_price: Money::new(dto.precio_unitario),
        quantity: dto.cantidad,
        available_stock: dto.stock,
        image_url: dto.imagen_url,
    }
}

/// Normalize an address record, resolving the identifier across the three
/// spellings different endpoints use.
///
/// # Errors
///
/// Returns [`ApiError::Malformed`] when no spelling carries an id.
pub fn convert_address(dto: DireccionDto) -> Result<Address, ApiError> {
    let id = dto
        .id
        .or(dto.id_direccion)
        .or(dto.direccion_id)
        .ok_or_else(|| {
            ApiError::Malformed("address record carries no identifier field".to_string())
        })?;

    Ok(Address {
        id: AddressId::new(id),
        street: dto.calle,
        city: dto.ciudad,
        state: dto.estado,
        postal_code: dto.codigo_postal,
        country: dto.pais,
        is_primary: dto.es_principal,
    })
}

/// # Errors
///
/// Returns [`ApiError::Malformed`] for an unrecognized `tipo` value.
pub fn convert_template(dto: MetodoPagoDto) -> Result<PaymentMethodTemplate, ApiError> {
    let kind: PaymentKind = dto.tipo.parse().map_err(ApiError::Malformed)?;

    Ok(PaymentMethodTemplate {
        id: PaymentTemplateId::new(dto.id),
        display_name: dto.nombre,
        kind,
        icon_url: dto.icono_url,
        visible: dto.visible,
        active_online: dto.activo_online,
        display_order: dto.orden,
    })
}

/// # Errors
///
/// Returns [`ApiError::Malformed`] for an unrecognized `tipo` value.
pub fn convert_saved_method(dto: MetodoPagoClienteDto) -> Result<SavedPaymentMethod, ApiError> {
    let kind: PaymentKind = dto.tipo.parse().map_err(ApiError::Malformed)?;

    Ok(SavedPaymentMethod {
        id: SavedMethodId::new(dto.id),
        alias: dto.alias,
        template_id: PaymentTemplateId::new(dto.id_metodo_pago),
        kind,
        masked_detail: dto.detalle_enmascarado,
        verified: dto.verificado,
        is_default: dto.es_predeterminado,
    })
}

pub fn convert_order(dto: OrdenDto) -> Order {
    Order {
        id: OrderId::new(dto.id),
        shipping_address_id: AddressId::new(dto.id_direccion_envio),
        total: Money::new(dto.total),
        status: dto.estado,
    }
}

pub fn convert_payment(dto: PagoDto) -> PaymentReceipt {
    PaymentReceipt {
        order_id: OrderId::new(dto.id_orden),
        amount: Money::new(dto.monto),
        status: dto.estado,
        transaction_id: dto.id_transaccion,
    }
}

pub fn convert_quotation_item(dto: CotizacionItemDto) -> QuotationItem {
    QuotationItem {
        id: QuotationItemId::new(dto.id),
        product_id: ProductId::new(dto.id_producto),
        quantity: dto.cantidad,
        unit_price: Money::new(dto.precio_unitario),
        discount_percent: dto.descuento_porcentaje,
    }
}

pub fn convert_quotation(dto: CotizacionDto) -> Quotation {
    Quotation {
        id: QuotationId::new(dto.id),
        client_id: ClientId::new(dto.id_cliente),
        expiration_date: dto.fecha_expiracion,
        notes: dto.notas,
        status: dto.estado,
        items: dto.items.into_iter().map(convert_quotation_item).collect(),
    }
}

/// Split an auth payload into its bearer token and client profile.
pub fn convert_auth(dto: AuthDataDto) -> (String, ClientProfile) {
    let profile = ClientProfile {
        id: ClientId::new(dto.id),
        name: dto.nombre,
        email: dto.email,
    };
    (dto.token, profile)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn direccion(id: Option<i32>, id_direccion: Option<i32>, direccion_id: Option<i32>) -> DireccionDto {
        DireccionDto {
            id,
            id_direccion,
            direccion_id,
            calle: "Av. Reforma 1".to_string(),
            ciudad: "CDMX".to_string(),
            estado: "CDMX".to_string(),
            codigo_postal: "06600".to_string(),
            pais: "MX".to_string(),
            es_principal: true,
        }
    }

    #[test]
    fn test_address_id_fallback_chain() {
        assert_eq!(
            convert_address(direccion(Some(1), Some(2), Some(3))).unwrap().id,
            AddressId::new(1)
        );
        assert_eq!(
            convert_address(direccion(None, Some(2), Some(3))).unwrap().id,
            AddressId::new(2)
        );
        assert_eq!(
            convert_address(direccion(None, None, Some(3))).unwrap().id,
            AddressId::new(3)
        );
    }

    #[test]
    fn test_address_without_id_is_malformed() {
        let result = convert_address(direccion(None, None, None));
        assert!(matches!(result, Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_unknown_template_kind_is_malformed() {
        let dto = MetodoPagoDto {
            id: 1,
            nombre: "PayPal".to_string(),
            tipo: "paypal".to_string(),
            icono_url: None,
            visible: true,
            activo_online: true,
            orden: 1,
        };
        assert!(matches!(convert_template(dto), Err(ApiError::Malformed(_))));
    }
}
