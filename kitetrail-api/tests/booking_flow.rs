use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use kitetrail_api::{app, AppState};
use kitetrail_core::booking::BookingManager;
use kitetrail_core::repository::FlightRepository;
use kitetrail_core::sync::NullSeatSync;
use kitetrail_domain::seed;
use kitetrail_store::SnapshotStore;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::util::ServiceExt;

fn test_app() -> Router {
    let dir = std::env::temp_dir().join(format!("kitetrail-api-{}", uuid::Uuid::new_v4()));
    let (events_tx, _) = tokio::sync::broadcast::channel(16);

    let manager = BookingManager::new(FlightRepository::new(seed::seed_flights()));
    app(AppState {
        manager: Arc::new(RwLock::new(manager)),
        snapshot: Arc::new(SnapshotStore::new(dir, "seats")),
        sync: Arc::new(NullSeatSync),
        events_tx,
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_list_flights() {
    let app = test_app();

    let (status, body) = send(&app, get("/api/flights")).await;
    assert_eq!(status, StatusCode::OK);

    let flights = body.as_array().unwrap();
    assert_eq!(flights.len(), 3);
    assert_eq!(flights[0]["id"], "KT123");
    assert_eq!(flights[0]["seats"].as_array().unwrap().len(), 90);
}

#[tokio::test]
async fn test_unknown_flight_is_404() {
    let app = test_app();

    let (status, body) = send(&app, get("/api/flights/KT999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_full_booking_flow() {
    let app = test_app();

    // select
    let (status, body) = send(&app, post_empty("/api/flights/KT123/seats/12A/select")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seat"]["status"], "selected");

    // confirm
    let (status, body) = send(
        &app,
        post_json(
            "/api/bookings",
            json!({"flight_id": "KT123", "seat_id": "12A", "passenger_name": "Jane Doe"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["booking"]["passenger_name"], "Jane Doe");
    assert_eq!(body["booking"]["seat_id"], "12A");

    // the seat is now off the market
    let (status, body) = send(&app, post_empty("/api/flights/KT123/seats/12A/select")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    // admin summary reflects the booking
    let (status, body) = send(&app, get("/api/admin/summary")).await;
    assert_eq!(status, StatusCode::OK);
    let kt123 = &body.as_array().unwrap()[0];
    assert_eq!(kt123["flight_id"], "KT123");
    assert_eq!(kt123["taken_seats"], 1);
    assert_eq!(kt123["occupants"][0]["seat_id"], "12A");
    assert_eq!(kt123["occupants"][0]["passenger_name"], "Jane Doe");

    // admin cancellation frees the seat
    let (status, body) = send(
        &app,
        post_json(
            "/api/bookings/cancel",
            json!({"flight_id": "KT123", "seat_id": "12A"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_, body) = send(&app, get("/api/flights/KT123")).await;
    let seat = body["seats"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == "12A")
        .unwrap()
        .clone();
    assert_eq!(seat["status"], "available");
    assert!(seat.get("passenger_name").is_none());
}

#[tokio::test]
async fn test_booking_without_selection_is_rejected() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/bookings",
            json!({"flight_id": "KT123", "seat_id": "12A", "passenger_name": "Jane Doe"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_cancel_without_booking_is_conflict() {
    let app = test_app();

    let (status, _) = send(
        &app,
        post_json(
            "/api/bookings/cancel",
            json!({"flight_id": "KT123", "seat_id": "12A"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_reset() {
    let app = test_app();

    send(&app, post_empty("/api/flights/KT123/seats/1A/select")).await;
    send(
        &app,
        post_json(
            "/api/bookings",
            json!({"flight_id": "KT123", "seat_id": "1A", "passenger_name": "Jane Doe"}),
        ),
    )
    .await;

    let (status, body) = send(&app, post_json("/api/admin/reset", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_, body) = send(&app, get("/api/admin/summary")).await;
    for flight in body.as_array().unwrap() {
        assert_eq!(flight["taken_seats"], 0);
    }
}
