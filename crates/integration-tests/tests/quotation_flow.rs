//! Quotation builder flows: header-first creation, item appends (single
//! and bulk) and locally derived totals.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use tienda_core::{ClientId, Money, ProductId, QuotationItemId};
use tienda_storefront::models::Product;
use tienda_storefront::quotations::{QuotationBuilder, QuotationItemDraft};

use tienda_integration_tests::{envelope, mock_backend, test_session};

fn product(id: i32, price_major: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Producto {id}"),
        description: None,
        unit_price: Money::from_major(price_major),
        stock: 100,
        category_id: None,
        image_url: None,
    }
}

fn expiration() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date")
}

#[tokio::test]
async fn test_header_first_then_items() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("POST"))
        .and(path("/cotizaciones"))
        .and(body_partial_json(json!({"id_cliente": 9})))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "id": 5,
            "id_cliente": 9,
            "fecha_expiracion": "2026-12-31",
            "estado": "draft",
        }))))
        .expect(1)
        .mount(&server)
        .await;

    // Item captures the catalog price and discount at add time
    Mock::given(method("POST"))
        .and(path("/cotizaciones/5/items"))
        .and(body_json(json!({
            "id_producto": 7,
            "cantidad": 3,
            "precio_unitario": "20",
            "descuento_porcentaje": "10",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "id": 1,
            "id_producto": 7,
            "cantidad": 3,
            "precio_unitario": "20",
            "descuento_porcentaje": "10",
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = QuotationBuilder::new(api);
    let id = builder
        .create(&session, ClientId::new(9), expiration(), None)
        .await
        .expect("create header");
    assert_eq!(i32::from(id), 5);

    builder
        .add_item(
            &session,
            &QuotationItemDraft {
                product: product(7, 20),
                quantity: 3,
                discount_percent: dec!(10),
            },
        )
        .await
        .expect("add item");

    // 3 * 20 minus 10%, with zero tax
    let quotation = builder.quotation().expect("loaded");
    assert_eq!(quotation.subtotal().amount(), dec!(54));
    assert_eq!(quotation.total().amount(), dec!(54));
    server.verify().await;
}

#[tokio::test]
async fn test_bulk_append_is_one_request() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("POST"))
        .and(path("/cotizaciones"))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "id": 6,
            "id_cliente": 9,
            "fecha_expiracion": "2026-12-31",
        }))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cotizaciones/6/items/bulk"))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!([
            {"id": 1, "id_producto": 7, "cantidad": 2, "precio_unitario": "20"},
            {"id": 2, "id_producto": 8, "cantidad": 1, "precio_unitario": "6"},
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = QuotationBuilder::new(api);
    builder
        .create(&session, ClientId::new(9), expiration(), None)
        .await
        .expect("create header");

    let drafts = vec![
        QuotationItemDraft {
            product: product(7, 20),
            quantity: 2,
            discount_percent: dec!(0),
        },
        QuotationItemDraft {
            product: product(8, 6),
            quantity: 1,
            discount_percent: dec!(0),
        },
    ];
    builder
        .add_items(&session, &drafts)
        .await
        .expect("bulk append");

    let quotation = builder.quotation().expect("loaded");
    assert_eq!(quotation.items.len(), 2);
    assert_eq!(quotation.subtotal().amount(), dec!(46));
    server.verify().await;
}

#[tokio::test]
async fn test_remove_item_updates_totals() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("GET"))
        .and(path("/cotizaciones/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": 5,
            "id_cliente": 9,
            "fecha_expiracion": "2026-12-31",
            "items": [
                {"id": 1, "id_producto": 7, "cantidad": 3, "precio_unitario": "20", "descuento_porcentaje": "10"},
                {"id": 2, "id_producto": 8, "cantidad": 1, "precio_unitario": "6"},
            ],
        }))))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/cotizaciones/5/items/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "item eliminado",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = QuotationBuilder::new(api);
    builder
        .load(&session, tienda_core::QuotationId::new(5))
        .await
        .expect("load");
    assert_eq!(builder.quotation().expect("loaded").subtotal().amount(), dec!(60));

    builder
        .remove_item(&session, QuotationItemId::new(2))
        .await
        .expect("remove item");

    assert_eq!(builder.quotation().expect("loaded").subtotal().amount(), dec!(54));
    server.verify().await;
}
