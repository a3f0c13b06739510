//! Router-level tests: the HTTP surface wired to the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use property_desk::{
    config::{AppState, Settings},
    db::memory_store::MemoryStore,
    models::ticket::{Ticket, TicketStatus},
    routes::app_router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> (Arc<MemoryStore>, Router) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::in_memory(Settings::default(), store.clone());
    (store, app_router(state))
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let resp = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_is_ok() {
    let (_, router) = app();
    let resp = router
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn ticket_lifecycle_over_http() {
    let (_, router) = app();

    let (status, created) = send(
        &router,
        Method::POST,
        "/api/tickets",
        Some(json!({ "title": "Porta emperrada", "dateCreated": { "seconds": 1700000000, "nanoseconds": 0 } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Open");
    assert_eq!(created["dateCreated"], "2023-11-14T22:13:20Z");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(&router, Method::POST, &format!("/api/tickets/{}/complete", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, board) = send(&router, Method::GET, "/api/tickets/board", None).await;
    assert_eq!(board["completed"]["cards"].as_array().unwrap().len(), 1);
    assert_eq!(board["active"]["emptyState"]["message"], "No active tickets");

    let (status, trashed) = send(&router, Method::DELETE, &format!("/api/tickets/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(trashed["deletedAt"].is_string());

    let (_, board) = send(&router, Method::GET, "/api/tickets/board", None).await;
    assert_eq!(board["deleted"]["cards"][0]["isDeleted"], true);

    let (status, _) = send(&router, Method::DELETE, &format!("/api/tickets/{}/purge", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, Method::POST, &format!("/api/tickets/{}/restore", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_ticket_title_is_rejected() {
    let (_, router) = app();
    let (status, body) = send(&router, Method::POST, "/api/tickets", Some(json!({ "title": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["title"].is_array());
}

#[tokio::test]
async fn board_filters_by_property_and_reap_endpoint_purges() {
    let (store, router) = app();
    let property = Uuid::new_v4();

    let base = Ticket {
        id: Uuid::new_v4(),
        title: "mine".to_string(),
        description: None,
        status: TicketStatus::Open,
        property_id: Some(property),
        date_created: Some(Utc::now()),
        date_completed: None,
        deleted_at: None,
        created_at: None,
        updated_at: None,
    };
    store.insert_ticket(base.clone());
    store.insert_ticket(Ticket {
        id: Uuid::new_v4(),
        title: "theirs".to_string(),
        property_id: Some(Uuid::new_v4()),
        ..base.clone()
    });
    store.insert_ticket(Ticket {
        id: Uuid::new_v4(),
        title: "ancient".to_string(),
        deleted_at: Some(Utc::now() - Duration::days(90)),
        ..base
    });

    let (_, board) = send(
        &router,
        Method::GET,
        &format!("/api/tickets/board?propertyId={}", property),
        None,
    )
    .await;
    let active = board["active"]["cards"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["title"], "mine");
    assert!(board["deleted"]["cards"].as_array().unwrap().is_empty());

    // Pode já ter sido apagado em segundo plano pelo GET acima
    let (status, outcome) = send(&router, Method::POST, "/api/tickets/reap", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["failed"], 0);
    assert!(store.tickets().iter().all(|t| t.title != "ancient"));
}

#[tokio::test]
async fn import_endpoint_reports_counts() {
    let (store, router) = app();
    store.add_property("Sanctuary Office Park");

    let payload = json!({
        "tenants": [
            { "tenantName": "Acme", "contacts": [{ "contactName": "TBD" }],
              "occupancies": [{ "buildingNumber": "9" }] },
            { "tenantName": "Zenith", "occupancies": [{ "buildingNumber": "1", "unitNumber": "105" }] }
        ]
    });

    let (status, report) = send(&router, Method::POST, "/api/imports/tenants", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["successCount"], 2);
    assert_eq!(report["errorCount"], 0);
    assert_eq!(report["contactsSkipped"], 1);
    assert_eq!(report["occupanciesSkipped"], 1);
    assert_eq!(report["occupanciesCreated"], 1);
    assert_eq!(report["buildings"].as_object().unwrap().len(), 5);
    assert!(store.contacts().is_empty());
}

#[tokio::test]
async fn import_into_unknown_property_is_not_found() {
    let (store, router) = app();

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/imports/tenants?propertyName=Nowhere",
        Some(json!({ "tenants": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Nowhere"));
    assert!(store.buildings().is_empty());
}

#[tokio::test]
async fn preview_endpoint_returns_plan() {
    let (_, router) = app();
    let (status, plan) = send(
        &router,
        Method::POST,
        "/api/imports/tenants/preview",
        Some(json!({ "tenants": [{ "tenantName": "Acme", "contacts": [{ "contactName": "Jo" }] }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["tenants"], 1);
    assert_eq!(plan["contactsToCreate"], 1);
}

#[tokio::test]
async fn malformed_import_body_gets_the_json_error_shape() {
    let (store, router) = app();
    store.add_property("Sanctuary Office Park");

    for uri in ["/api/imports/tenants", "/api/imports/tenants/preview"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(r#"{ "tenants": [ { "tenantName": "#))
            .unwrap();

        let resp = router.clone().oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("Arquivo de importação inválido"));
    }

    assert!(store.tenants().is_empty());
}
