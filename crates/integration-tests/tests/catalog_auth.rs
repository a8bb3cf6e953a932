//! Auth and catalog flows: login builds a token-bearing session, the
//! token travels as a bearer header, and the product listing is cached.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use tienda_storefront::catalog::{CatalogView, filter_products};

use tienda_integration_tests::{envelope, mock_backend, test_session};

#[tokio::test]
async fn test_login_builds_authenticated_session() {
    let (server, api) = mock_backend().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "ana@example.com",
            "password": "hunter2good",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "token": "jwt-abc",
            "id": 9,
            "nombre": "Ana Garcia",
            "email": "ana@example.com",
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let session = api
        .login("ana@example.com", "hunter2good")
        .await
        .expect("login");

    assert!(session.is_authenticated());
    assert_eq!(
        session.client().map(|c| c.name.as_str()),
        Some("Ana Garcia")
    );
    server.verify().await;
}

#[tokio::test]
async fn test_register_builds_authenticated_session() {
    let (server, api) = mock_backend().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "nombre": "Ana Garcia",
            "email": "ana@example.com",
            "password": "hunter2good",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "token": "jwt-new",
            "id": 12,
            "nombre": "Ana Garcia",
            "email": "ana@example.com",
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let session = api
        .register("Ana Garcia", "ana@example.com", "hunter2good")
        .await
        .expect("register");

    assert!(session.is_authenticated());
    assert_eq!(
        session.client().map(|c| c.email.as_str()),
        Some("ana@example.com")
    );
    server.verify().await;
}

#[tokio::test]
async fn test_rejected_login_surfaces_server_message() {
    let (server, api) = mock_backend().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "credenciales invalidas",
        })))
        .mount(&server)
        .await;

    let err = api
        .login("ana@example.com", "wrong")
        .await
        .expect_err("must reject");
    assert!(err.to_string().contains("credenciales invalidas"));
}

#[tokio::test]
async fn test_session_token_travels_as_bearer_header() {
    let (server, api) = mock_backend().await;

    Mock::given(method("GET"))
        .and(path("/carrito"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    api.get_cart(&test_session()).await.expect("cart");
    server.verify().await;
}

#[tokio::test]
async fn test_product_listing_is_cached() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"id": 1, "nombre": "Taladro industrial", "descripcion": "Taladro de banco 900W", "precio": "899.90", "stock": 4, "id_categoria": 1},
            {"id": 2, "nombre": "Martillo", "precio": "120", "stock": 0, "id_categoria": 1},
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = CatalogView::new(api);
    let first = catalog.products(&session).await.expect("first fetch");
    let second = catalog.products(&session).await.expect("cached fetch");
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);

    // Local filtering over the cached list
    let hits = filter_products(&first, "taladro", None);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Taladro industrial");

    server.verify().await;
}

#[tokio::test]
async fn test_invalidate_refetches() {
    let (server, api) = mock_backend().await;
    let session = test_session();

    Mock::given(method("GET"))
        .and(path("/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    let catalog = CatalogView::new(api);
    catalog.products(&session).await.expect("first fetch");
    catalog.invalidate().await;
    catalog.products(&session).await.expect("refetch");
    server.verify().await;
}
