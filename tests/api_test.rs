use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use rusty_room_booking::adapters::memory::InMemoryRoomRepository;
use rusty_room_booking::adapters::mock::{FixedClock, NotificationService, SentNotification};
use rusty_room_booking::api::handlers::AppState;
use rusty_room_booking::api::router::create_router;
use rusty_room_booking::api::types::*;
use rusty_room_booking::application::booking::ServiceDependencies;
use rusty_room_booking::domain::{Room, RoomId};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// テスト用のヘルパー関数
// ============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 28, 10, 0, 0).unwrap()
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

struct TestApp {
    router: axum::Router,
    clock: Arc<FixedClock>,
    notifications: Arc<NotificationService>,
}

/// インメモリのアダプターでアプリケーションを構築する
fn setup_app() -> TestApp {
    let clock = Arc::new(FixedClock::new(now()));
    let notifications = Arc::new(NotificationService::new());
    let room_repository = Arc::new(InMemoryRoomRepository::with_rooms([
        Room::new(RoomId::new("room1").unwrap(), "Room A"),
        Room::new(RoomId::new("room2").unwrap(), "Room B"),
    ]));

    let service_deps = ServiceDependencies {
        clock: clock.clone(),
        room_repository,
        notification_service: notifications.clone(),
    };

    TestApp {
        router: create_router(Arc::new(AppState { service_deps })),
        clock,
        notifications,
    }
}

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn post_booking(
    router: &axum::Router,
    room_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> (StatusCode, Vec<u8>) {
    let body = json!({
        "room_id": room_id,
        "start_time": rfc3339(start),
        "end_time": rfc3339(end),
    });

    send(
        router,
        Request::builder()
            .method("POST")
            .uri("/bookings")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn delete_booking(router: &axum::Router, booking_id: &str) -> (StatusCode, Vec<u8>) {
    send(
        router,
        Request::builder()
            .method("DELETE")
            .uri(format!("/bookings/{}", booking_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn get_available(router: &axum::Router, query: &str) -> (StatusCode, Vec<u8>) {
    send(
        router,
        Request::builder()
            .method("GET")
            .uri(format!("/rooms/available{}", query))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

// ============================================================================
// E2Eテスト
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let (status, body) = send(
        &app.router,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_create_booking_returns_created() {
    let app = setup_app();

    let (status, body) = post_booking(
        &app.router,
        "room1",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let response: BookRoomResponse = serde_json::from_slice(&body).unwrap();
    assert!(response.booked);
    let booking = response.booking.unwrap();
    assert_eq!(booking.room_id, "room1");
    assert_eq!(booking.start_time, now() + Duration::hours(1));

    assert!(matches!(
        app.notifications.sent().as_slice(),
        [SentNotification::BookingConfirmation(_)]
    ));
}

#[tokio::test]
async fn test_create_booking_conflict_when_slot_taken() {
    let app = setup_app();
    let start = now() + Duration::hours(1);
    let end = now() + Duration::hours(2);

    let (first, _) = post_booking(&app.router, "room1", start, end).await;
    let (second, body) = post_booking(&app.router, "room1", start, end).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    let response: BookRoomResponse = serde_json::from_slice(&body).unwrap();
    assert!(!response.booked);
    assert!(response.booking.is_none());
}

#[tokio::test]
async fn test_create_booking_in_the_past_is_bad_request() {
    let app = setup_app();

    let (status, body) = post_booking(
        &app.router,
        "room1",
        now() - Duration::hours(1),
        now() + Duration::hours(1),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "START_TIME_IN_PAST");
    assert_eq!(error.message, "cannot book a time in the past");
}

#[tokio::test]
async fn test_create_booking_unknown_room_is_unprocessable() {
    let app = setup_app();

    let (status, body) = post_booking(
        &app.router,
        "room9",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn test_create_booking_blank_room_reports_time_errors_first() {
    let app = setup_app();

    let (status, body) = post_booking(
        &app.router,
        "  ",
        now() - Duration::hours(1),
        now() + Duration::hours(1),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "START_TIME_IN_PAST");

    let (status, body) = post_booking(
        &app.router,
        "",
        now() + Duration::hours(2),
        now() + Duration::hours(1),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "INVALID_TIME_RANGE");

    let (status, body) = post_booking(
        &app.router,
        "",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn test_create_booking_notification_failure_is_server_error() {
    let app = setup_app();
    app.notifications.set_failing(true);

    let (status, body) = post_booking(
        &app.router,
        "room1",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "NOTIFICATION_ERROR");

    // 予約自体は保存されているので同じ枠は埋まっている
    app.notifications.set_failing(false);
    let (status, _) = post_booking(
        &app.router,
        "room1",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancel_booking_flow() {
    let app = setup_app();

    let (_, body) = post_booking(
        &app.router,
        "room1",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;
    let created: BookRoomResponse = serde_json::from_slice(&body).unwrap();
    let booking_id = created.booking.unwrap().booking_id;

    let (status, body) = delete_booking(&app.router, &booking_id).await;
    assert_eq!(status, StatusCode::OK);
    let response: CancelBookingResponse = serde_json::from_slice(&body).unwrap();
    assert!(response.cancelled);

    // 2回目は見つからない
    let (status, body) = delete_booking(&app.router, &booking_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let response: CancelBookingResponse = serde_json::from_slice(&body).unwrap();
    assert!(!response.cancelled);

    assert!(matches!(
        app.notifications.sent().as_slice(),
        [
            SentNotification::BookingConfirmation(_),
            SentNotification::CancellationConfirmation(_)
        ]
    ));
}

#[tokio::test]
async fn test_cancel_started_booking_is_unprocessable() {
    let app = setup_app();

    let (_, body) = post_booking(
        &app.router,
        "room1",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;
    let created: BookRoomResponse = serde_json::from_slice(&body).unwrap();
    let booking_id = created.booking.unwrap().booking_id;

    // 予約の開始時刻まで時計を進める
    app.clock.advance(Duration::hours(1));

    let (status, body) = delete_booking(&app.router, &booking_id).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "BOOKING_ALREADY_STARTED");
}

#[tokio::test]
async fn test_cancel_finished_booking_is_unprocessable() {
    let app = setup_app();

    let (_, body) = post_booking(
        &app.router,
        "room1",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;
    let created: BookRoomResponse = serde_json::from_slice(&body).unwrap();
    let booking_id = created.booking.unwrap().booking_id;

    // 予約の終了後に時計を合わせる
    app.clock.set(now() + Duration::hours(3));

    let (status, body) = delete_booking(&app.router, &booking_id).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "BOOKING_ALREADY_STARTED");

    // 過去の時間枠としては予約できない
    let (status, _) = post_booking(
        &app.router,
        "room2",
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_available_rooms_excludes_booked_room() {
    let app = setup_app();
    let start = now() + Duration::hours(1);
    let end = now() + Duration::hours(2);

    post_booking(&app.router, "room2", start, end).await;

    let (status, body) = get_available(
        &app.router,
        &format!("?start_time={}&end_time={}", rfc3339(start), rfc3339(end)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rooms: Vec<RoomResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_id, "room1");
    assert_eq!(rooms[0].name, "Room A");
}

#[tokio::test]
async fn test_available_rooms_requires_both_times() {
    let app = setup_app();

    let (status, body) = get_available(
        &app.router,
        &format!("?start_time={}", rfc3339(now())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "MISSING_TIME_RANGE");
}

#[tokio::test]
async fn test_available_rooms_rejects_inverted_range() {
    let app = setup_app();

    let (status, body) = get_available(
        &app.router,
        &format!(
            "?start_time={}&end_time={}",
            rfc3339(now() + Duration::hours(2)),
            rfc3339(now() + Duration::hours(1))
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "INVALID_TIME_RANGE");
}
