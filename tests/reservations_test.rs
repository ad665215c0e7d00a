mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use common::TestApp;

fn tomorrow() -> String {
    (Utc::now() + Duration::days(1)).to_rfc3339()
}

#[tokio::test]
async fn booking_claims_the_table() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, table_id) = app.seed_front_of_house(&admin).await;
    let (_, customer) = app.seed_staff("guest1", "customer").await;

    let (status, table) = app.get(&format!("/tables/{table_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["is_available"], true);

    let (status, reservation) = app
        .post(
            "/reservations",
            Some(&customer),
            json!({
                "table_id": table_id,
                "reservation_time": tomorrow(),
                "guests_count": 2,
                "special_requests": "window seat"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{reservation}");
    assert_eq!(reservation["status"], "booked");
    assert_eq!(reservation["table_id"], table_id);

    let (_, table) = app.get(&format!("/tables/{table_id}"), Some(&admin)).await;
    assert_eq!(table["is_available"], false);
}

#[tokio::test]
async fn a_claimed_table_cannot_be_booked_again() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, table_id) = app.seed_front_of_house(&admin).await;
    let (_, first) = app.seed_staff("guest1", "customer").await;
    let (_, second) = app.seed_staff("guest2", "customer").await;

    let body = json!({
        "table_id": table_id,
        "reservation_time": tomorrow(),
        "guests_count": 2
    });

    let (status, _) = app.post("/reservations", Some(&first), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = app.post("/reservations", Some(&second), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{err}");
    assert!(err["message"]
        .as_str()
        .unwrap()
        .contains("not available"));
}

#[tokio::test]
async fn concurrent_bookings_yield_exactly_one_reservation() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, table_id) = app.seed_front_of_house(&admin).await;
    let (_, first) = app.seed_staff("guest1", "customer").await;
    let (_, second) = app.seed_staff("guest2", "customer").await;

    let body = json!({
        "table_id": table_id,
        "reservation_time": tomorrow(),
        "guests_count": 2
    });

    let (a, b) = tokio::join!(
        app.post("/reservations", Some(&first), body.clone()),
        app.post("/reservations", Some(&second), body.clone()),
    );

    let statuses = [a.0, b.0];
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::CREATED)
            .count(),
        1,
        "exactly one booking must win: {statuses:?}"
    );
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::BAD_REQUEST)
            .count(),
        1
    );
}

#[tokio::test]
async fn cancelling_frees_the_table() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, table_id) = app.seed_front_of_house(&admin).await;
    let (_, customer) = app.seed_staff("guest1", "customer").await;

    let (_, reservation) = app
        .post(
            "/reservations",
            Some(&customer),
            json!({
                "table_id": table_id,
                "reservation_time": tomorrow(),
                "guests_count": 2
            }),
        )
        .await;
    let reservation_id = reservation["id"].as_i64().unwrap();

    let (status, _) = app
        .delete(&format!("/reservations/{reservation_id}"), Some(&customer))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, table) = app.get(&format!("/tables/{table_id}"), Some(&admin)).await;
    assert_eq!(table["is_available"], true);

    // The table can be booked again.
    let (status, _) = app
        .post(
            "/reservations",
            Some(&customer),
            json!({
                "table_id": table_id,
                "reservation_time": tomorrow(),
                "guests_count": 3
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn only_the_owner_may_modify_or_cancel() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, table_id) = app.seed_front_of_house(&admin).await;
    let (_, owner) = app.seed_staff("guest1", "customer").await;
    let (_, other) = app.seed_staff("guest2", "customer").await;

    let (_, reservation) = app
        .post(
            "/reservations",
            Some(&owner),
            json!({
                "table_id": table_id,
                "reservation_time": tomorrow(),
                "guests_count": 2
            }),
        )
        .await;
    let id = reservation["id"].as_i64().unwrap();

    let (status, _) = app
        .put(
            &format!("/reservations/{id}"),
            Some(&other),
            json!({ "guests_count": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/reservations/{id}"), Some(&other))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .put(
            &format!("/reservations/{id}"),
            Some(&owner),
            json!({ "guests_count": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["guests_count"], 4);
    // Untouched fields survive a partial update.
    assert_eq!(updated["table_id"], table_id);
}

#[tokio::test]
async fn booking_validations() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, table_id) = app.seed_front_of_house(&admin).await;
    let (_, customer) = app.seed_staff("guest1", "customer").await;

    let (status, _) = app
        .post(
            "/reservations",
            Some(&customer),
            json!({
                "table_id": 9999,
                "reservation_time": tomorrow(),
                "guests_count": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/reservations",
            Some(&customer),
            json!({
                "table_id": table_id,
                "reservation_time": tomorrow(),
                "guests_count": 0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The failed attempts must not have claimed the table.
    let (_, table) = app.get(&format!("/tables/{table_id}"), Some(&admin)).await;
    assert_eq!(table["is_available"], true);
}

#[tokio::test]
async fn listing_shows_only_own_reservations() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, table_id) = app.seed_front_of_house(&admin).await;
    let (_, branch) = app
        .post(
            "/branches",
            Some(&admin),
            json!({ "address": "2 Side St", "city": "Springfield", "restaurant_id": 1 }),
        )
        .await;
    let (_, second_table) = app
        .post(
            "/tables",
            Some(&admin),
            json!({ "table_number": "T2", "seats": 2, "branch_id": branch["id"] }),
        )
        .await;
    let table2 = second_table["id"].as_i64().unwrap();

    let (_, alice) = app.seed_staff("alice", "customer").await;
    let (_, bob) = app.seed_staff("bob", "customer").await;

    app.post(
        "/reservations",
        Some(&alice),
        json!({ "table_id": table_id, "reservation_time": tomorrow(), "guests_count": 2 }),
    )
    .await;
    app.post(
        "/reservations",
        Some(&bob),
        json!({ "table_id": table2, "reservation_time": tomorrow(), "guests_count": 2 }),
    )
    .await;

    let (status, list) = app.get("/reservations", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["table_id"], table_id);
}
