// lodge-client/tests/reservation_flow.rs
// 预订提交 / 管理端集成测试

mod common;

use std::cell::Cell;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use common::FakeBackend;
use lodge_client::{ClientError, MemoryTokenStore, ReservationService, Session};
use regex::Regex;
use serde_json::json;
use shared::error::AppError;
use shared::models::{
    ADMIN_RESERVATION_PACKAGE_ID, AnalyticsPeriod, PaymentStatus, ReservationDraft,
    ReservationStatus, ReservationUpdate, RoomPackage,
};
use shared::request::{AdminReservationQuery, SortOrder};
use shared::submission::{GuardRejection, SubmitState};

const T0: i64 = 1_900_000_000_000;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
}

fn draft() -> ReservationDraft {
    ReservationDraft {
        first_name: "Amara".into(),
        last_name: "Silva".into(),
        email: "amara@example.com".into(),
        phone: "+94 77 123 4567".into(),
        country: "Sri Lanka".into(),
        package_id: "pkg-river-view".into(),
        room_type: "Deluxe".into(),
        check_in: Some(today() + Duration::days(1)),
        check_out: Some(today() + Duration::days(3)),
        rooms_wanted: "1".into(),
        adults: "2".into(),
        children: "0".into(),
        ..Default::default()
    }
}

fn package() -> RoomPackage {
    RoomPackage {
        id: "pkg-river-view".into(),
        name: "River View".into(),
        room_id: "R1".into(),
        price_per_night: 120.0,
        adults_included: 2,
        available: true,
        ..Default::default()
    }
}

fn created() -> serde_json::Value {
    json!({
        "ok": true,
        "reservation": {
            "_id": "66f1",
            "reservationNumber": "RES-2001",
            "guest": { "firstName": "Amara", "lastName": "Silva", "email": "amara@example.com" },
            "checkIn": "2030-06-02T00:00:00.000Z",
            "checkOut": "2030-06-04T00:00:00.000Z",
            "status": "pending"
        }
    })
}

fn service(backend: &FakeBackend) -> ReservationService {
    ReservationService::new(backend.client(Session::in_memory()))
}

#[tokio::test]
async fn test_submit_sends_key_in_body_and_header() {
    let backend = FakeBackend::new();
    backend.respond("POST", "/api/reservations/reserve", 201, created());
    let svc = service(&backend);
    let called = Cell::new(false);

    let created = svc
        .submit_at(&draft(), Some(&package()), today(), T0, |created| {
            let reservation = created.reservation.as_ref().unwrap();
            assert_eq!(reservation.reservation_number.as_deref(), Some("RES-2001"));
            called.set(true);
        })
        .await
        .unwrap();

    assert!(called.get());
    assert_eq!(created.id(), Some("66f1"));
    assert_eq!(
        created.reservation.unwrap().check_in,
        NaiveDate::from_ymd_opt(2030, 6, 2)
    );

    let sent = backend.requests_to("POST", "/api/reservations/reserve");
    assert_eq!(sent.len(), 1);
    let key = sent[0].body["idempotencyKey"].as_str().unwrap().to_string();
    let pattern = Regex::new(r"^reservation_\d+_[a-z0-9]{9}$").unwrap();
    assert!(pattern.is_match(&key), "{key}");
    assert!(key.starts_with(&format!("reservation_{T0}_")));
    assert_eq!(sent[0].header("idempotency-key"), Some(key.as_str()));

    let body = &sent[0].body;
    assert_eq!(body["guest"]["firstName"], "Amara");
    assert_eq!(body["packageId"], "pkg-river-view");
    assert_eq!(body["checkIn"], "2030-06-02");
    assert_eq!(body["adults"], 2);
    // 2 nights x 1 room x 120
    assert_eq!(body["totalAmount"], 240.0);
}

#[tokio::test]
async fn test_second_submit_within_cooldown_sends_nothing() {
    let backend = FakeBackend::new();
    backend.respond("POST", "/api/reservations/reserve", 201, created());
    let svc = service(&backend);

    svc.submit_at(&draft(), None, today(), T0, |_| {}).await.unwrap();
    assert_eq!(svc.submit_state(T0 + 10), SubmitState::Cooldown { expires_at: T0 + 2000 });

    let err = svc
        .submit_at(&draft(), None, today(), T0 + 1500, |_| panic!("must not succeed"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::DuplicateSubmission(GuardRejection::CoolingDown { remaining_ms: 500 })
    ));
    assert_eq!(backend.requests_to("POST", "/api/reservations/reserve").len(), 1);

    svc.submit_at(&draft(), None, today(), T0 + 2500, |_| {}).await.unwrap();
    let sent = backend.requests_to("POST", "/api/reservations/reserve");
    assert_eq!(sent.len(), 2);
    assert_ne!(sent[0].body["idempotencyKey"], sent[1].body["idempotencyKey"]);
    // no package price known, so no total
    assert!(sent[1].body.get("totalAmount").is_none());
}

#[tokio::test]
async fn test_loose_created_record_still_counts_as_success() {
    let backend = FakeBackend::new();
    backend.respond(
        "POST",
        "/api/reservations/reserve",
        201,
        json!({
            "ok": true,
            "reservation": {
                "_id": "abc",
                "id": "abc",
                "totalAmount": null,
                "paymentStatus": "awaiting_transfer",
                "status": "pending"
            }
        }),
    );
    let svc = service(&backend);
    let called = Cell::new(false);

    let created = svc
        .submit_at(&draft(), None, today(), T0, |_| called.set(true))
        .await
        .unwrap();
    assert!(called.get());
    assert_eq!(created.id(), Some("abc"));
    let reservation = created.reservation.unwrap();
    assert_eq!(reservation.total_amount, 0.0);
    assert_eq!(reservation.payment_status, PaymentStatus::Pending);

    // the guard is cooling down, so a quick second click sends nothing
    let err = svc
        .submit_at(&draft(), None, today(), T0 + 100, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::DuplicateSubmission(_)));
    assert_eq!(backend.requests_to("POST", "/api/reservations/reserve").len(), 1);
}

#[tokio::test]
async fn test_undecodable_created_record_is_returned_raw() {
    let backend = FakeBackend::new();
    backend.respond(
        "POST",
        "/api/reservations/reserve",
        201,
        json!({ "ok": true, "reservation": "RES-2002" }),
    );
    let svc = service(&backend);

    let created = svc.submit_at(&draft(), None, today(), T0, |_| {}).await.unwrap();
    assert_eq!(created.raw, json!("RES-2002"));
    assert!(created.reservation.is_none());
    assert_eq!(created.id(), None);
    assert_eq!(
        svc.submit_state(T0 + 1),
        SubmitState::Cooldown { expires_at: T0 + 2000 }
    );
}

#[tokio::test]
async fn test_invalid_draft_is_not_sent() {
    let backend = FakeBackend::new();
    let svc = service(&backend);
    let mut bad = draft();
    bad.email = "not-an-email".into();
    bad.check_out = bad.check_in;

    let err = svc.submit_at(&bad, None, today(), T0, |_| {}).await.unwrap_err();
    match &err {
        ClientError::Validation(errors) => {
            assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
            assert_eq!(errors.get("checkOut"), Some("Check-out date must be after check-in date"));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(backend.requests().is_empty());
    assert_eq!(svc.submit_state(T0), SubmitState::Idle);
}

#[tokio::test]
async fn test_failed_submit_surfaces_message_and_allows_retry() {
    let backend = FakeBackend::new();
    backend.respond(
        "POST",
        "/api/reservations/reserve",
        409,
        json!({ "ok": false, "message": "Room R1 is fully booked for these dates" }),
    );
    let svc = service(&backend);

    let err = svc.submit_at(&draft(), None, today(), T0, |_| {}).await.unwrap_err();
    assert_eq!(
        err.user_message(lodge_client::reservation::SUBMIT_FAILURE),
        "Room R1 is fully booked for these dates"
    );
    assert_eq!(svc.submit_state(T0 + 1), SubmitState::Idle);

    backend.respond("POST", "/api/reservations/reserve", 200, json!({ "ok": false }));
    let err = svc.submit_at(&draft(), None, today(), T0 + 100, |_| {}).await.unwrap_err();
    assert_eq!(
        err.user_message(lodge_client::reservation::SUBMIT_FAILURE),
        lodge_client::reservation::SUBMIT_FAILURE
    );
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn test_admin_reservation_uses_custom_price() {
    let backend = FakeBackend::new();
    backend.respond("POST", "/api/reservations/reserve", 201, created());
    let svc = service(&backend);

    let mut admin = draft();
    admin.package_id = ADMIN_RESERVATION_PACKAGE_ID.into();
    admin.custom_room_id = "R12".into();
    admin.custom_price_per_night = "85.50".into();
    admin.custom_adults_included = "2".into();
    admin.rooms_wanted = "2".into();

    svc.submit_at(&admin, None, today(), T0, |_| {}).await.unwrap();
    let body = &backend.requests()[0].body;
    assert_eq!(body["adminReservation"]["roomId"], "R12");
    assert_eq!(body["totalAmount"], 342.0);
}

#[tokio::test]
async fn test_form_lookups() {
    let backend = FakeBackend::new();
    backend
        .respond(
            "GET",
            "/api/room_package/packages",
            200,
            json!({ "data": [{ "_id": "pkg-1", "name": "Tree House", "roomId": "R3", "pricePerNight": 95.0 }] }),
        )
        .respond("GET", "/api/room/ids", 200, json!(["R3", { "roomId": "R1" }, "R3"]))
        .respond(
            "GET",
            "/api/room/R3",
            200,
            json!({ "room": { "roomId": "R3", "roomType": "Tree House", "active": true, "availableCount": 1 } }),
        );
    let svc = service(&backend);

    let packages = svc.packages().await.unwrap();
    assert_eq!(packages[0].id, "pkg-1");
    assert_eq!(packages[0].price_per_night, 95.0);

    assert_eq!(svc.room_ids().await.unwrap(), vec!["R1", "R3"]);

    let room = svc.room("R3").await.unwrap();
    assert_eq!(room.room_type, "Tree House");
    assert!(room.is_bookable());

    assert!(matches!(svc.room("R404").await, Err(ClientError::Api { status: 404, .. })));
}

#[tokio::test]
async fn test_admin_list_sends_filters() {
    let backend = FakeBackend::new();
    backend.respond(
        "GET",
        "/api/reservations/admin",
        200,
        json!({ "data": [{ "_id": "a", "status": "booked" }], "total": 1, "page": 1, "limit": 10 }),
    );
    let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::with_token("admin-token"))));
    let svc = ReservationService::new(backend.client(session));

    let query = AdminReservationQuery::new()
        .limit(10)
        .status(ReservationStatus::Booked)
        .sort("checkIn", SortOrder::Desc);
    let page = svc.admin_list(&query).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 1);

    let sent = &backend.requests()[0];
    assert_eq!(
        sent.query.as_deref(),
        Some("page=1&limit=10&status=booked&sort=checkIn%3Adesc")
    );
    assert_eq!(sent.header("authorization"), Some("Bearer admin-token"));
}

#[tokio::test]
async fn test_admin_unauthorized_clears_session() {
    let backend = FakeBackend::new();
    backend.respond_error("GET", "/api/reservations/admin", AppError::not_authenticated());
    let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::with_token("expired"))));
    let mut rx = session.subscribe();
    let svc = ReservationService::new(backend.client(session.clone()));

    let err = svc.admin_list(&AdminReservationQuery::new()).await.unwrap_err();
    match err {
        ClientError::SessionExpired { redirect } => assert_eq!(redirect, "/login"),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(!session.is_logged_in());
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());
}

#[tokio::test]
async fn test_admin_list_all_walks_pages() {
    let backend = FakeBackend::new();
    // the fake ignores the page parameter, so every page returns the same rows
    backend.respond(
        "GET",
        "/api/reservations/admin",
        200,
        json!({ "data": [{ "_id": "a" }, { "_id": "b" }], "total": 5, "limit": 2 }),
    );
    let svc = service(&backend);
    let all = svc
        .admin_list_all(&AdminReservationQuery::new().limit(2))
        .await
        .unwrap();
    assert_eq!(all.len(), 6);
    let pages: Vec<_> = backend
        .requests()
        .into_iter()
        .filter_map(|r| r.query)
        .collect();
    assert_eq!(pages.len(), 3);
    assert!(pages[2].starts_with("page=3&"));
}

#[tokio::test]
async fn test_admin_update_and_delete() {
    let backend = FakeBackend::new();
    backend
        .respond("PUT", "/api/reservations/admin/a1", 200, json!({ "ok": true }))
        .respond("DELETE", "/api/reservations/admin/a1", 200, json!({ "ok": true }));
    let svc = service(&backend);

    let update = ReservationUpdate {
        status: Some(ReservationStatus::Cancelled),
        ..Default::default()
    };
    svc.admin_update("a1", &update).await.unwrap();
    svc.admin_delete("a1").await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].body, json!({ "status": "cancelled" }));
    assert_eq!(requests[1].method, "DELETE");
}

#[tokio::test]
async fn test_analytics_by_period() {
    let backend = FakeBackend::new();
    backend
        .respond(
            "GET",
            "/api/reservations/admin/analytics/weekly",
            200,
            json!({ "data": { "totalReservations": 7, "totalRevenue": 1820.0 } }),
        )
        .respond(
            "GET",
            "/api/reservations/admin/analytics",
            200,
            json!({ "totalReservations": 40 }),
        );
    let svc = service(&backend);

    let weekly = svc.analytics(Some(AnalyticsPeriod::Weekly)).await.unwrap();
    assert_eq!(weekly.total_reservations, 7);
    assert_eq!(weekly.total_revenue, 1820.0);

    let overall = svc.analytics(None).await.unwrap();
    assert_eq!(overall.total_reservations, 40);
}
