#![allow(clippy::unwrap_used)]
// Controller behaviour against a mocked backend.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sirs_api::session::default_access_lifetime;
use sirs_api::{ApiClient, Session, SessionContext, TransportConfig};
use sirs_core::{Command, CommandResult, Controller, CoreError, EntityId, EntityKind, FetchStatus};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let session = Session::new(
        SecretString::from("token".to_owned()),
        Some(SecretString::from("refresh".to_owned())),
        Utc::now(),
        default_access_lifetime(),
    );
    let client = ApiClient::new(
        &server.uri(),
        &TransportConfig::default(),
        SessionContext::with_session(session),
    )
    .unwrap();
    (server, Controller::with_client(client, None))
}

fn product(id: u64, stock: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "brand": "Beko",
        "price": "100.00",
        "stock": stock,
        "category": { "id": 1, "name": "Cooling", "parent": null, "product_count": 3 }
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_applies_snapshot() {
    let (server, ctrl) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2, "next": null, "previous": null,
            "results": [product(1, 0), product(2, 12)]
        })))
        .mount(&server)
        .await;

    let count = ctrl.refresh(EntityKind::Products).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(ctrl.store().product_count(), 2);
    assert!(matches!(ctrl.store().fetch_status(), FetchStatus::Ok { .. }));
}

#[tokio::test]
async fn failed_refresh_keeps_stale_snapshot() {
    let (server, ctrl) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(1, 3)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    ctrl.refresh(EntityKind::Products).await.unwrap();
    let err = ctrl.refresh(EntityKind::Products).await.unwrap_err();

    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    assert_eq!(ctrl.store().product_count(), 1);
    assert!(matches!(
        ctrl.store().fetch_status(),
        FetchStatus::Failed { .. }
    ));
}

#[tokio::test]
async fn overtaken_response_is_dropped_without_recording_success() {
    let (server, ctrl) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([product(1, 3), product(2, 5)]))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(3, 7)])))
        .mount(&server)
        .await;

    let (older, (newer, status_after_newer)) = tokio::join!(
        ctrl.refresh(EntityKind::Products),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let count = ctrl.refresh(EntityKind::Products).await;
            (count, ctrl.store().fetch_status())
        },
    );

    assert_eq!(newer.unwrap(), 1);
    assert_eq!(older.unwrap(), 1);
    assert_eq!(ctrl.store().products_snapshot()[0].id, EntityId::new(3));
    assert_eq!(ctrl.store().fetch_status(), status_after_newer);
}

#[tokio::test]
async fn bulk_delete_reports_per_item_outcomes_and_refetches() {
    let (server, ctrl) = setup().await;

    for id in [1, 3] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/v1/products/{id}/")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/api/v1/products/2/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "You do not have permission to perform this action."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(2, 5)])))
        .expect(1)
        .mount(&server)
        .await;

    let ids = vec![EntityId::new(1), EntityId::new(2), EntityId::new(3)];
    let result = ctrl.execute(Command::DeleteProducts { ids }).await.unwrap();

    let CommandResult::Bulk(outcome) = result else {
        panic!("expected bulk outcome");
    };
    assert_eq!(outcome.succeeded, vec![EntityId::new(1), EntityId::new(3)]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].id, EntityId::new(2));
    assert!(outcome.failed[0].reason.contains("permission"));

    assert_eq!(ctrl.store().product_count(), 1);
}

#[tokio::test]
async fn bulk_delete_on_expired_session_spends_refresh_token_once() {
    let server = MockServer::start().await;
    let expired = Session::new(
        SecretString::from("old".to_owned()),
        Some(SecretString::from("refresh-1".to_owned())),
        Utc::now() - TimeDelta::hours(2),
        default_access_lifetime(),
    );
    let client = ApiClient::new(
        &server.uri(),
        &TransportConfig::default(),
        SessionContext::with_session(expired),
    )
    .unwrap();
    let ctrl = Controller::with_client(client, None);

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .and(body_json(json!({ "refresh": "refresh-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "new", "refresh": "refresh-2" })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is blacklisted"
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/v1/products/\d+/$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let ids = vec![EntityId::new(1), EntityId::new(2), EntityId::new(3)];
    let result = ctrl.execute(Command::DeleteProducts { ids }).await.unwrap();

    let CommandResult::Bulk(outcome) = result else {
        panic!("expected bulk outcome");
    };
    assert!(outcome.is_complete(), "failures: {:?}", outcome.failed);
    assert_eq!(outcome.succeeded.len(), 3);
    assert!(ctrl.session().is_active());
}

#[tokio::test]
async fn update_of_missing_product_is_not_found() {
    let (server, ctrl) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/products/42/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .mount(&server)
        .await;

    let draft = sirs_core::ProductDraft {
        stock: Some(3),
        ..sirs_core::ProductDraft::default()
    };
    let err = ctrl
        .execute(Command::UpdateProduct {
            id: EntityId::new(42),
            draft,
        })
        .await
        .unwrap_err();

    match err {
        CoreError::NotFound { entity_type, identifier } => {
            assert_eq!(entity_type, "Product");
            assert_eq!(identifier, "42");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_server() {
    let (server, ctrl) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = ctrl
        .execute(Command::CreateProduct(sirs_core::ProductDraft::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn bare_category_ids_get_names() {
    let (server, ctrl) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Oven", "price": "10", "stock": 1, "category": 4 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 4, "name": "Cooking" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    ctrl.refresh(EntityKind::Products).await.unwrap();

    let snapshot = ctrl.store().products_snapshot();
    assert_eq!(snapshot[0].category_name(), "Cooking");
}
