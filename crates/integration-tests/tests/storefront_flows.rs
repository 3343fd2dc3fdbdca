//! End-to-end storefront flows: sign-in, cart checkout, sale workflow,
//! landing content, and persistence across client instances.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value, json};

use vitrina_client::normalize::{normalize_product, normalize_sale};
use vitrina_client::{ApiClient, Checkout, ClientStore, FileStore, Outcome, WorkflowError};
use vitrina_core::{SaleStatus, TransitionError, UserRole};
use vitrina_integration_tests::StubBackend;

fn product_json(id: &str, price: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": price,
        "categoryId": "c1",
        "stock": 10,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z"
    })
}

fn sale_json(id: u64, status: &str) -> Value {
    json!({
        "ID": id,
        "UserID": 7,
        "Status": status,
        "Total": 25.5,
        "Items": [
            {"ID": 1, "SaleID": id, "ProductID": "p1", "Quantity": 2, "Price": "12.75"}
        ],
        "CreatedAt": "2024-05-02T09:30:00Z",
        "UpdatedAt": "2024-05-02T09:30:00Z"
    })
}

fn auth_json(role: &str) -> Value {
    json!({
        "token": "tok-123",
        "user": {"id": 7, "email": "ana@example.com", "name": "Ana", "role": role}
    })
}

#[tokio::test]
async fn test_login_starts_session() {
    let stub = StubBackend::start().await;
    stub.respond("POST", "/auth/login", 200, &auth_json("admin"));
    stub.respond("GET", "/users", 200, &json!([]));
    let (api, _) = stub.client();

    let user = api
        .login("ana@example.com", &SecretString::from("secret"))
        .await
        .unwrap()
        .ok()
        .unwrap();

    assert_eq!(user.role, UserRole::Admin);
    assert!(api.is_authenticated());
    assert!(api.is_admin());

    let request = stub.last_request().unwrap();
    assert_eq!(
        request.body,
        Some(json!({"email": "ana@example.com", "password": "secret"}))
    );

    api.list_users().await;
    assert_eq!(
        stub.last_request().unwrap().authorization.as_deref(),
        Some("Bearer tok-123")
    );

    api.logout().unwrap();
    assert!(!api.is_authenticated());
    assert!(!api.is_admin());
}

#[tokio::test]
async fn test_rejected_login_keeps_signed_out() {
    let stub = StubBackend::start().await;
    stub.respond("POST", "/auth/login", 401, &json!({"error": "invalid credentials"}));
    let (api, diagnostics) = stub.client();

    let outcome = api
        .login("ana@example.com", &SecretString::from("wrong"))
        .await
        .unwrap();

    assert_eq!(outcome.rejection().unwrap().message, "invalid credentials");
    assert!(!api.is_authenticated());
    assert_eq!(diagnostics.count(), 0);
}

#[tokio::test]
async fn test_current_user_accepts_wrapped_payload() {
    let stub = StubBackend::start().await;
    stub.respond(
        "GET",
        "/auth/me",
        200,
        &json!({"user": {"ID": 7, "Email": "ana@example.com", "Role": "cliente"}}),
    );
    let (api, _) = stub.client();

    let user = api.current_user().await.unwrap().ok().unwrap();
    assert_eq!(user.id.as_str(), "7");
    assert_eq!(user.name, "");
    assert!(!user.is_admin());
}

#[tokio::test]
async fn test_checkout_requires_login_and_items() {
    let stub = StubBackend::start().await;
    let (api, _) = stub.client();

    assert_eq!(api.checkout().await.unwrap(), Checkout::LoginRequired);

    api.set_token(Some(SecretString::from("tok"))).unwrap();
    assert_eq!(api.checkout().await.unwrap(), Checkout::EmptyCart);

    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_checkout_places_sale_and_clears_cart() {
    let stub = StubBackend::start().await;
    stub.respond("POST", "/sales", 201, &sale_json(42, "pendiente"));
    let (api, _) = stub.client();
    api.set_token(Some(SecretString::from("tok"))).unwrap();

    let widget = normalize_product(&product_json("p1", "12.75")).unwrap();
    api.cart()
        .update(|cart| cart.add(widget.clone(), 2))
        .unwrap();

    let Checkout::Placed(sale) = api.checkout().await.unwrap() else {
        panic!("expected a placed sale");
    };

    assert_eq!(sale.id.as_str(), "42");
    assert_eq!(sale.status, SaleStatus::Pending);
    assert_eq!(sale.total.to_string(), "25.5");
    assert!(api.cart().load().is_empty());

    let request = stub.last_request().unwrap();
    assert_eq!(
        request.body,
        Some(json!({"items": [{"productId": "p1", "quantity": 2}]}))
    );
}

#[tokio::test]
async fn test_rejected_checkout_keeps_cart() {
    let stub = StubBackend::start().await;
    stub.respond("POST", "/sales", 400, &json!({"error": "insufficient stock"}));
    let (api, _) = stub.client();
    api.set_token(Some(SecretString::from("tok"))).unwrap();

    let widget = normalize_product(&product_json("p1", "3")).unwrap();
    api.cart().update(|cart| cart.add(widget, 1)).unwrap();

    let outcome = api.checkout().await.unwrap();
    assert!(matches!(outcome, Checkout::Rejected(ref r) if r.message == "insufficient stock"));
    assert_eq!(api.cart().load().unit_count(), 1);
}

#[tokio::test]
async fn test_cancelled_sale_is_not_sent() {
    let stub = StubBackend::start().await;
    let (api, _) = stub.client();
    let sale = normalize_sale(&sale_json(9, "cancelada")).unwrap();

    let err = api
        .change_sale_status(&sale, SaleStatus::Fulfilled)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Transition(TransitionError::Terminal)
    ));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_status_change_sends_wire_value() {
    let stub = StubBackend::start().await;
    stub.respond("PATCH", "/sales/9/status", 200, &sale_json(9, "planificada"));
    let (api, _) = stub.client();
    let sale = normalize_sale(&sale_json(9, "pendiente")).unwrap();

    let updated = api
        .change_sale_status(&sale, SaleStatus::Scheduled)
        .await
        .unwrap()
        .ok()
        .unwrap();

    assert_eq!(updated.status, SaleStatus::Scheduled);
    assert_eq!(
        stub.last_request().unwrap().body,
        Some(json!({"status": "planificada"}))
    );
}

#[tokio::test]
async fn test_customer_cancel_only_for_pending() {
    let stub = StubBackend::start().await;
    stub.respond("PATCH", "/sales/9/cancel", 200, &sale_json(9, "cancelada"));
    let (api, _) = stub.client();

    let scheduled = normalize_sale(&sale_json(9, "planificada")).unwrap();
    let err = api.cancel_own_sale(&scheduled).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Transition(TransitionError::NotCancellable(SaleStatus::Scheduled))
    ));
    assert!(stub.requests().is_empty());

    let pending = normalize_sale(&sale_json(9, "pendiente")).unwrap();
    let cancelled = api.cancel_own_sale(&pending).await.unwrap().ok().unwrap();
    assert_eq!(cancelled.status, SaleStatus::Cancelled);
    assert_eq!(stub.last_request().unwrap().body, None);
}

#[tokio::test]
async fn test_landing_placeholder_when_unavailable() {
    let stub = StubBackend::start().await;
    let (api, diagnostics) = stub.client();

    let page = api.landing_page_or_placeholder().await.unwrap().ok().unwrap();
    assert_eq!(page, vitrina_core::LandingPageData::placeholder());
    assert_eq!(diagnostics.count(), 0);

    stub.respond_raw("GET", "/landing", 500, "");
    assert!(api.landing_page_or_placeholder().await.is_err());
    assert_eq!(diagnostics.count(), 1);
}

#[tokio::test]
async fn test_landing_sections_ordered_and_filtered() {
    let stub = StubBackend::start().await;
    stub.respond(
        "GET",
        "/landing",
        200,
        &json!({
            "CompanyName": "Tienda Ana",
            "Sections": [
                {"ID": "s2", "Type": "about", "Order": 2},
                {"ID": "s1", "Type": "hero", "Order": 1, "Visible": false},
                {"ID": "s3", "Type": "contact", "Order": 3.0}
            ]
        }),
    );
    let (api, _) = stub.client();

    let page = api.get_landing_page().await.unwrap().ok().unwrap();
    assert_eq!(page.company_name, "Tienda Ana");

    let ordered: Vec<_> = page.ordered_sections().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ordered, vec!["s1", "s2", "s3"]);

    let visible: Vec<_> = page.visible_sections().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(visible, vec!["s2", "s3"]);
}

#[tokio::test]
async fn test_catalog_groups_products() {
    let stub = StubBackend::start().await;
    stub.respond(
        "GET",
        "/categories",
        200,
        &json!([
            {"id": "c1", "name": "Bebidas", "createdAt": "2024-05-01T10:00:00Z", "updatedAt": "2024-05-01T10:00:00Z"},
            {"id": "c2", "name": "Snacks", "createdAt": "2024-05-01T10:00:00Z", "updatedAt": "2024-05-01T10:00:00Z"}
        ]),
    );
    stub.respond(
        "GET",
        "/products",
        200,
        &json!([product_json("p1", "1.50"), product_json("p2", "2")]),
    );
    let (api, _) = stub.client();

    let catalog = api.catalog_or_placeholder().await.unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].0.name, "Bebidas");
    assert_eq!(catalog[0].1.len(), 2);
    assert!(catalog[1].1.is_empty());
}

#[tokio::test]
async fn test_catalog_empty_when_unavailable() {
    let stub = StubBackend::start().await;
    let (api, diagnostics) = stub.client();

    assert!(api.catalog_or_placeholder().await.unwrap().is_empty());
    assert_eq!(diagnostics.count(), 0);
}

#[tokio::test]
async fn test_user_listing_never_fails() {
    let stub = StubBackend::start().await;
    stub.respond_raw("GET", "/users", 500, "");
    let (api, diagnostics) = stub.client();

    assert!(api.list_users().await.is_empty());
    assert_eq!(diagnostics.count(), 1);

    stub.respond("GET", "/users", 403, &json!({"error": "forbidden"}));
    assert!(api.list_users().await.is_empty());
    assert_eq!(diagnostics.count(), 1);
}

#[tokio::test]
async fn test_session_and_cart_survive_restart() {
    let stub = StubBackend::start().await;
    stub.respond("POST", "/auth/login", 200, &auth_json("cliente"));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let client = |store: FileStore| {
        ApiClient::builder(stub.api_url())
            .store(Arc::new(store))
            .build()
            .unwrap()
    };

    let first = client(FileStore::open(&path));
    first
        .login("ana@example.com", &SecretString::from("secret"))
        .await
        .unwrap();
    let widget = normalize_product(&product_json("p1", "4.00")).unwrap();
    first.cart().update(|cart| cart.add(widget, 3)).unwrap();
    drop(first);

    let store = FileStore::open(&path);
    assert_eq!(store.get("userRole").as_deref(), Some("cliente"));
    let second = client(store);
    assert!(second.is_authenticated());
    assert!(!second.is_admin());
    assert_eq!(second.cart().load().unit_count(), 3);

    second.logout().unwrap();
    assert!(!client(FileStore::open(&path)).is_authenticated());
}

#[tokio::test]
async fn test_created_entities_are_normalized() {
    let stub = StubBackend::start().await;
    stub.respond("POST", "/products", 201, &product_json("p9", "19.90"));
    let (api, _) = stub.client();

    let input = vitrina_core::ProductInput {
        name: Some("Nuevo".to_string()),
        ..Default::default()
    };
    let created = api.create_product(&input).await.unwrap();

    assert!(matches!(created, Outcome::Ok(ref p) if p.id.as_str() == "p9"));
    let body = stub.last_request().unwrap().body.unwrap();
    assert_eq!(body["name"], "Nuevo");
}
