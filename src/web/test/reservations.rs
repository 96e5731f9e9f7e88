// src/web/test/reservations.rs
use super::*;
use serde_json::json;

struct Hotel {
    app: TestApp,
    alice: i64,
    bob: i64,
    room: i64,
    other_room: i64,
    alice_cookie: String,
    bob_cookie: String,
    admin_cookie: String,
}

async fn hotel() -> Hotel {
    let app = TestApp::new().await;
    let alice = app.user("alice", Role::User).await;
    let bob = app.user("bob", Role::User).await;
    app.user("admin", Role::Admin).await;
    let room = app.room("101", "Deluxe").await;
    let other_room = app.room("102", "Standard").await;
    let alice_cookie = app.login("alice").await;
    let bob_cookie = app.login("bob").await;
    let admin_cookie = app.login("admin").await;
    Hotel { app, alice, bob, room, other_room, alice_cookie, bob_cookie, admin_cookie }
}

fn booking(user_id: i64, room_id: i64, date: &str) -> Value {
    json!({ "userId": user_id, "roomId": room_id, "date": date })
}

#[tokio::test]
async fn user_books_a_free_room_and_reads_it_back() {
    let h = hotel().await;
    let date = future_date(10);

    let created = h.app.post("/api/reservations", booking(h.alice, h.room, &date), &h.alice_cookie).await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["userId"], h.alice);
    assert_eq!(created.body["roomId"], h.room);
    assert_eq!(created.body["date"], date.as_str());

    let id = created.body["id"].as_i64().unwrap();
    let fetched = h.app.get(&format!("/api/reservations/{}", id), &h.alice_cookie).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);

    // The profile lists the reservation id
    let profile = h.app.get(&format!("/api/users/{}", h.alice), &h.alice_cookie).await;
    assert_eq!(profile.body["reservations"], json!([id]));
}

#[tokio::test]
async fn double_booking_is_a_conflict() {
    let h = hotel().await;
    let date = future_date(5);

    let first = h.app.post("/api/reservations", booking(h.alice, h.room, &date), &h.alice_cookie).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = h.app.post("/api/reservations", booking(h.bob, h.room, &date), &h.bob_cookie).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "Room is already booked on this date.");
}

#[tokio::test]
async fn non_admin_cannot_book_for_someone_else() {
    let h = hotel().await;

    let res = h
        .app
        .post("/api/reservations", booking(h.bob, h.room, &future_date(3)), &h.alice_cookie)
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let by_admin = h
        .app
        .post("/api/reservations", booking(h.bob, h.room, &future_date(3)), &h.admin_cookie)
        .await;
    assert_eq!(by_admin.status, StatusCode::OK);
}

#[tokio::test]
async fn past_dates_and_unknown_rooms_are_rejected() {
    let h = hotel().await;
    let yesterday = (Utc::now().date_naive() - Days::new(1)).to_string();

    let past = h.app.post("/api/reservations", booking(h.alice, h.room, &yesterday), &h.alice_cookie).await;
    assert_eq!(past.status, StatusCode::BAD_REQUEST);

    let no_room = h
        .app
        .post("/api/reservations", booking(h.alice, 999, &future_date(1)), &h.alice_cookie)
        .await;
    assert_eq!(no_room.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn others_reservations_are_off_limits_except_for_admin() {
    let h = hotel().await;
    let date = future_date(7);
    let created = h.app.post("/api/reservations", booking(h.alice, h.room, &date), &h.alice_cookie).await;
    let id = created.body["id"].as_i64().unwrap();
    let uri = format!("/api/reservations/{}", id);

    assert_eq!(h.app.get(&uri, &h.bob_cookie).await.status, StatusCode::FORBIDDEN);
    assert_eq!(
        h.app.put(&uri, booking(h.alice, h.other_room, &date), &h.bob_cookie).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(h.app.delete(&uri, &h.bob_cookie).await.status, StatusCode::FORBIDDEN);
    assert_eq!(
        h.app.get(&format!("/api/reservations/user/{}", h.alice), &h.bob_cookie).await.status,
        StatusCode::FORBIDDEN
    );

    // Admin can do all of it
    assert_eq!(h.app.get(&uri, &h.admin_cookie).await.status, StatusCode::OK);
    let moved = h.app.put(&uri, booking(h.alice, h.other_room, &date), &h.admin_cookie).await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["roomId"], h.other_room);
    let for_alice = h.app.get(&format!("/api/reservations/user/{}", h.alice), &h.admin_cookie).await;
    assert_eq!(for_alice.body.as_array().unwrap().len(), 1);
    assert_eq!(h.app.delete(&uri, &h.admin_cookie).await.status, StatusCode::NO_CONTENT);
    assert_eq!(h.app.get(&uri, &h.admin_cookie).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owner_updates_and_cancels_their_booking() {
    let h = hotel().await;
    let date = future_date(4);
    let created = h.app.post("/api/reservations", booking(h.alice, h.room, &date), &h.alice_cookie).await;
    let uri = format!("/api/reservations/{}", created.body["id"]);

    // Same slot: must not conflict with itself
    let same = h.app.put(&uri, booking(h.alice, h.room, &date), &h.alice_cookie).await;
    assert_eq!(same.status, StatusCode::OK);

    // Handing it over to bob is not allowed
    let handover = h.app.put(&uri, booking(h.bob, h.room, &date), &h.alice_cookie).await;
    assert_eq!(handover.status, StatusCode::FORBIDDEN);

    let new_date = future_date(6);
    let moved = h.app.put(&uri, booking(h.alice, h.room, &new_date), &h.alice_cookie).await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["date"], new_date.as_str());

    assert_eq!(h.app.delete(&uri, &h.alice_cookie).await.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn moving_onto_a_taken_slot_conflicts() {
    let h = hotel().await;
    let date = future_date(8);
    h.app.post("/api/reservations", booking(h.bob, h.room, &date), &h.bob_cookie).await;
    let mine = h
        .app
        .post("/api/reservations", booking(h.alice, h.other_room, &date), &h.alice_cookie)
        .await;

    let res = h
        .app
        .put(
            &format!("/api/reservations/{}", mine.body["id"]),
            booking(h.alice, h.room, &date),
            &h.alice_cookie,
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn listings_are_filtered_for_non_admins() {
    let h = hotel().await;
    let date = future_date(2);
    h.app.post("/api/reservations", booking(h.alice, h.room, &date), &h.alice_cookie).await;
    h.app.post("/api/reservations", booking(h.bob, h.other_room, &date), &h.bob_cookie).await;

    let mine = h.app.get("/api/reservations", &h.alice_cookie).await;
    let mine = mine.body.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["userId"], h.alice);

    let all = h.app.get("/api/reservations", &h.admin_cookie).await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);

    let uri = format!("/api/reservations/date?date={}", date);
    assert_eq!(h.app.get(&uri, &h.bob_cookie).await.body.as_array().unwrap().len(), 1);
    assert_eq!(h.app.get(&uri, &h.admin_cookie).await.body.as_array().unwrap().len(), 2);

    let other_day = format!("/api/reservations/date?date={}", future_date(20));
    assert_eq!(h.app.get(&other_day, &h.admin_cookie).await.body, json!([]));

    let bad = h.app.get("/api/reservations/date?date=tomorrow", &h.admin_cookie).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert!(bad.body["error"].is_string());
}

#[tokio::test]
async fn malformed_requests_get_a_json_error() {
    let h = hotel().await;

    let bad_id = h.app.get("/api/reservations/abc", &h.alice_cookie).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert!(bad_id.body["error"].is_string());

    let no_date = h
        .app
        .post("/api/reservations", json!({ "userId": h.alice, "roomId": h.room }), &h.alice_cookie)
        .await;
    assert_eq!(no_date.status, StatusCode::BAD_REQUEST);
    assert!(no_date.body["error"].as_str().unwrap().contains("date"));

    let no_query = h.app.get("/api/reservations/date", &h.alice_cookie).await;
    assert_eq!(no_query.status, StatusCode::BAD_REQUEST);
    assert!(no_query.body["error"].is_string());

    // Nothing was booked along the way
    assert_eq!(h.app.get("/api/reservations", &h.admin_cookie).await.body, json!([]));
}

#[tokio::test]
async fn deleting_a_missing_reservation_is_not_found() {
    let h = hotel().await;
    assert_eq!(
        h.app.delete("/api/reservations/12345", &h.admin_cookie).await.status,
        StatusCode::NOT_FOUND
    );
}
