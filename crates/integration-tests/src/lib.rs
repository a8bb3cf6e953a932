//! Shared helpers for the storefront integration tests.
//!
//! Every test runs the client against a `wiremock` server that stands in
//! for the Tienda backend, wrapping payloads in the backend's
//! `{success, message, data}` envelope.

use serde_json::{Value, json};
use wiremock::MockServer;

use tienda_core::ClientId;
use tienda_storefront::api::ApiClient;
use tienda_storefront::models::ClientProfile;
use tienda_storefront::session::Session;

/// Start a mock backend and a client pointed at it.
pub async fn mock_backend() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let api = ApiClient::new(server.uri());
    (server, api)
}

/// Wrap a payload in the backend's success envelope.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({
        "success": true,
        "message": null,
        "data": data,
    })
}

/// An authenticated session for a fixed test client.
#[must_use]
pub fn test_session() -> Session {
    Session::authenticated(
        "test-token",
        ClientProfile {
            id: ClientId::new(9),
            name: "Ana Garcia".to_string(),
            email: "ana@example.com".to_string(),
        },
    )
}
