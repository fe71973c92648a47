#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use chrono::{TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sirs_api::models::ProductPayload;
use sirs_api::session::default_access_lifetime;
use sirs_api::{ApiClient, Error, Session, SessionContext};

// ── Helpers ─────────────────────────────────────────────────────────

fn session(access: &str, refresh: &str) -> Session {
    Session::new(
        SecretString::from(access.to_owned()),
        Some(SecretString::from(refresh.to_owned())),
        Utc::now(),
        default_access_lifetime(),
    )
}

async fn setup() -> (MockServer, ApiClient, SessionContext) {
    let server = MockServer::start().await;
    let ctx = SessionContext::with_session(session("access-1", "refresh-1"));
    let client = ApiClient::with_client(reqwest::Client::new(), &server.uri(), ctx.clone()).unwrap();
    (server, client, ctx)
}

fn product(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "brand": "Beko",
        "price": "1499.00",
        "stock": 3,
        "category": { "id": 1, "name": "Fridges", "parent": null, "product_count": 2 }
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_installs_session() {
    let server = MockServer::start().await;
    let ctx = SessionContext::new();
    let client = ApiClient::with_client(reqwest::Client::new(), &server.uri(), ctx.clone()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/token/"))
        .and(body_json(json!({
            "username": "admin",
            "password": "hunter2",
            "platform": "web"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "acc",
            "refresh": "ref",
            "role": "admin",
            "username": "admin"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: SecretString = "hunter2".to_string().into();
    let session = client.login("admin", &secret).await.unwrap();

    assert_eq!(session.role.as_deref(), Some("admin"));
    let stored = ctx.current().unwrap();
    assert_eq!(stored.access.expose_secret(), "acc");
    assert_eq!(stored.refresh.unwrap().expose_secret(), "ref");
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let server = MockServer::start().await;
    let client =
        ApiClient::with_client(reqwest::Client::new(), &server.uri(), SessionContext::new())
            .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let secret: SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    match result {
        Err(Error::Authentication { message }) => {
            assert!(message.contains("No active account"), "message: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.session().is_active());
}

#[tokio::test]
async fn test_requests_without_session_fail_fast() {
    let server = MockServer::start().await;
    let client =
        ApiClient::with_client(reqwest::Client::new(), &server.uri(), SessionContext::new())
            .unwrap();

    let result = client.list_products().await;
    assert!(matches!(result, Err(Error::NotLoggedIn)));
}

// ── List envelopes ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_bare_array() {
    let (server, client, _ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([product(1, "Fridge A"), product(2, "Oven B")])),
        )
        .mount(&server)
        .await;

    let products = client.list_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Fridge A");
    assert_eq!(products[1].price.as_str(), "1499.00");
}

#[tokio::test]
async fn test_list_paged_envelope_follows_next_links() {
    let (server, client, _ctx) = setup().await;
    let next = format!("{}/api/v1/products/?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "previous": format!("{}/api/v1/products/", server.uri()),
            "results": [product(3, "Washer C")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": next,
            "previous": null,
            "results": [product(1, "Fridge A"), product(2, "Oven B")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = client.list_products().await.unwrap();

    let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_list_sends_page_size() {
    let server = MockServer::start().await;
    let ctx = SessionContext::with_session(session("access-1", "refresh-1"));
    let client = ApiClient::with_client(reqwest::Client::new(), &server.uri(), ctx)
        .unwrap()
        .with_page_size(500);

    Mock::given(method("GET"))
        .and(path("/api/v1/categories/"))
        .and(query_param("page_size", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{ "id": 1, "name": "Fridges", "parent": null, "product_count": 4 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories[0].product_count, Some(4));
}

#[tokio::test]
async fn test_list_deliveries_bare_array_with_status_filter() {
    let (server, client, _ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/deliveries/"))
        .and(query_param("status", "in_transit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 9,
            "customer": { "id": 4, "username": "ayse", "full_name": "Ayse K", "phone": "555" },
            "product": "Dishwasher",
            "delivery_date": "2026-03-02",
            "status": "in_transit",
            "status_display": "Yolda",
            "address": "Lefkosa",
            "address_lat": 35.18,
            "address_lng": 33.36,
            "notes": "",
            "created_at": "2026-03-01T09:00:00Z"
        }])))
        .mount(&server)
        .await;

    let deliveries = client.list_deliveries(Some("in_transit")).await.unwrap();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(
        deliveries[0].customer.as_ref().unwrap().full_name.as_deref(),
        Some("Ayse K")
    );
}

// ── Token refresh ───────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_once() {
    let (server, client, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .and(body_json(json!({ "refresh": "refresh-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "access-2", "refresh": "refresh-2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(1, "Fridge A")])))
        .expect(1)
        .mount(&server)
        .await;

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 1);

    let stored = ctx.current().unwrap();
    assert_eq!(stored.access.expose_secret(), "access-2");
    assert_eq!(stored.refresh.unwrap().expose_secret(), "refresh-2");
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let (server, client, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is blacklisted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.list_products().await;

    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
    assert!(!ctx.is_active());
}

#[tokio::test]
async fn test_expiring_token_is_refreshed_before_request() {
    let server = MockServer::start().await;
    let stale = Session::new(
        SecretString::from("old".to_owned()),
        Some(SecretString::from("refresh-1".to_owned())),
        Utc::now() - TimeDelta::minutes(90),
        default_access_lifetime(),
    );
    let ctx = SessionContext::with_session(stale);
    let client = ApiClient::with_client(reqwest::Client::new(), &server.uri(), ctx).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "new" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "username": "admin", "role": "admin", "is_active": true }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client.list_users().await.unwrap();
    assert_eq!(users[0].username, "admin");
}

/// Refresh endpoint that honours `refresh-1` once and rejects it after
/// rotation, as the backend does with blacklisting enabled.
async fn mount_single_use_refresh(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .and(body_json(json!({ "refresh": "refresh-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "access-2", "refresh": "refresh-2" })),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is blacklisted"
        })))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_concurrent_rejections_share_one_refresh() {
    let (server, client, ctx) = setup().await;
    mount_single_use_refresh(&server).await;

    Mock::given(method("DELETE"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;

    let (a, b, c) = tokio::join!(
        client.delete_product(1),
        client.delete_product(2),
        client.delete_product(3),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok(), "{a:?} {b:?} {c:?}");
    let stored = ctx.current().unwrap();
    assert_eq!(stored.access.expose_secret(), "access-2");
    assert_eq!(stored.refresh.unwrap().expose_secret(), "refresh-2");
}

#[tokio::test]
async fn test_expired_session_is_refreshed_once_for_concurrent_requests() {
    let server = MockServer::start().await;
    let expired = Session::new(
        SecretString::from("access-1".to_owned()),
        Some(SecretString::from("refresh-1".to_owned())),
        Utc::now() - TimeDelta::minutes(90),
        default_access_lifetime(),
    );
    let ctx = SessionContext::with_session(expired);
    let client = ApiClient::with_client(reqwest::Client::new(), &server.uri(), ctx.clone()).unwrap();
    mount_single_use_refresh(&server).await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(product(5, "Oven"))))
        .expect(3)
        .mount(&server)
        .await;

    let (a, b, c) = tokio::join!(
        client.get_product(5),
        client.get_product(5),
        client.get_product(5),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok(), "{a:?} {b:?} {c:?}");
    assert!(ctx.is_active());
}

// ── Response decoding ───────────────────────────────────────────────

#[tokio::test]
async fn test_non_json_body_with_multibyte_text_is_deserialization_error() {
    let (server, client, _ctx) = setup().await;

    let body = format!("{}ş bakım modunda", "a".repeat(199));
    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .mount(&server)
        .await;

    match client.list_products().await {
        Err(Error::Deserialization { message, body: raw }) => {
            assert!(message.contains("body preview"), "{message}");
            assert_eq!(raw, body);
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_product_sends_partial_body() {
    let (server, client, _ctx) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/products/7/"))
        .and(body_json(json!({ "stock": 12 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(product(7, "Fridge A")))
        .expect(1)
        .mount(&server)
        .await;

    let body = ProductPayload {
        stock: Some(12),
        ..ProductPayload::default()
    };
    let updated = client.update_product(7, &body).await.unwrap();
    assert_eq!(updated.id, 7);
}

#[tokio::test]
async fn test_create_product_validation_error() {
    let (server, client, _ctx) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "name": ["This field is required."]
        })))
        .mount(&server)
        .await;

    let result = client.create_product(&ProductPayload::default()).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "name: This field is required.");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_product() {
    let (server, client, _ctx) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/products/4/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_product(4).await.unwrap();
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let (server, client, _ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/99/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .mount(&server)
        .await;

    let err = client.get_product(99).await.unwrap_err();
    assert!(err.is_not_found());
}
