//! Cart synchronization against a mock backend: mutations are keyed by
//! the server-assigned line id, local state follows the server's response,
//! and client-side rejections produce no traffic.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use tienda_core::{Money, ProductId};
use tienda_storefront::cart::CartStore;
use tienda_storefront::models::Product;

use tienda_integration_tests::{envelope, mock_backend, test_session};

fn cart_line(id: i32, product_id: i32, cantidad: u32) -> serde_json::Value {
    json!({
        "id": id,
        "id_producto": product_id,
        "nombre": "Taladro industrial",
        "precio_unitario": "50",
        "cantidad": cantidad,
        "stock": 10,
    })
}

fn widget() -> Product {
    Product {
        id: ProductId::new(7),
        name: "Taladro industrial".to_string(),
        description: None,
        unit_price: Money::from_major(50),
        stock: 10,
        category_id: None,
        image_url: None,
    }
}

#[tokio::test]
async fn test_add_item_creates_remote_line_and_syncs() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("POST"))
        .and(path("/carrito"))
        .and(body_json(json!({"id_producto": 7, "cantidad": 1})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(envelope(json!([cart_line(11, 7, 1)]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cart = CartStore::new(api);
    cart.add_item(&session, &widget()).await.expect("add item");

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 1);
    assert_eq!(cart.total(), Money::from_major(50));
}

#[tokio::test]
async fn test_add_existing_item_increments_by_line_id() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("GET"))
        .and(path("/carrito"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([cart_line(11, 7, 1)]))),
        )
        .mount(&server)
        .await;

    // Increment travels as an update on line 11, not a second create
    Mock::given(method("PUT"))
        .and(path("/carrito/11"))
        .and(body_json(json!({"cantidad": 2})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([cart_line(11, 7, 2)]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cart = CartStore::new(api);
    cart.refresh(&session).await.expect("refresh");
    cart.add_item(&session, &widget()).await.expect("add item");

    assert_eq!(cart.lines()[0].quantity, 2);
    server.verify().await;
}

#[tokio::test]
async fn test_zero_quantity_deletes_line() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("GET"))
        .and(path("/carrito"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([cart_line(11, 7, 2)]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/carrito/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let mut cart = CartStore::new(api);
    cart.refresh(&session).await.expect("refresh");
    cart.update_quantity(&session, ProductId::new(7), 0)
        .await
        .expect("update to zero");

    assert!(cart.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn test_stock_rejection_sends_no_request() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("GET"))
        .and(path("/carrito"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([cart_line(11, 7, 2)]))),
        )
        .mount(&server)
        .await;

    let mut cart = CartStore::new(api);
    cart.refresh(&session).await.expect("refresh");

    cart.update_quantity(&session, ProductId::new(7), 99)
        .await
        .expect_err("must reject over-stock");

    // The only recorded request is the initial refresh
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
}

#[tokio::test]
async fn test_failed_mutation_leaves_local_state_untouched() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("GET"))
        .and(path("/carrito"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([cart_line(11, 7, 2)]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/carrito/11"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "stock insuficiente",
        })))
        .mount(&server)
        .await;

    let mut cart = CartStore::new(api);
    cart.refresh(&session).await.expect("refresh");

    let err = cart
        .update_quantity(&session, ProductId::new(7), 5)
        .await
        .expect_err("server rejects");
    assert!(err.to_string().contains("stock insuficiente"));
    assert_eq!(cart.lines()[0].quantity, 2);
}
