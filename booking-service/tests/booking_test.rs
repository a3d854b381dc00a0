//! Bookings, shared rosters and schedules.
//!
//! Run with: TEST_DATABASE_URL=postgres://... cargo test -p booking-service -- --ignored

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Local, NaiveDate};
use common::{spawn_app, TestApp};
use uuid::Uuid;

fn day_ahead(days: i64) -> NaiveDate {
    Local::now().date_naive() + Duration::days(days)
}

fn window_form(day: NaiveDate, from: &str, to: &str) -> String {
    format!(
        "play_date_start={}+{}&play_date_end={}+{}",
        day, from, day, to
    )
}

/// Owner-created venue with one field; returns the field id.
async fn seeded_field(app: &TestApp) -> String {
    let owner = app.signed_in_owner("Owner").await;

    let (_, body) = app
        .post_form(
            "/api/v1/venues",
            "name=Stadium&address=Jl.+Asia+Afrika&phone=0211234",
            Some(&owner),
        )
        .await;
    let venue_id = body["data"]["venue_id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post_form(
            &format!("/api/v1/venues/{}/fields", venue_id),
            "name=Main&type=soccer",
            Some(&owner),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["field_id"].as_str().unwrap().to_string()
}

async fn book(app: &TestApp, token: &str, field_id: &str, day: NaiveDate) -> String {
    let (status, body) = app
        .post_form(
            &format!("/api/v1/fields/{}/bookings", field_id),
            &window_form(day, "19:00:00", "21:00:00"),
            Some(token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["booking_id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore] // Requires database
async fn booking_owner_is_the_first_player() {
    let app = spawn_app().await;
    let field_id = seeded_field(&app).await;
    let (token, email) = app.signed_in_user("Andi").await;
    let day = day_ahead(3);

    let (status, body) = app
        .post_form(
            &format!("/api/v1/fields/{}/bookings", field_id),
            &window_form(day, "19:00:00", "21:00:00"),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["play_date_start"], format!("{} 19:00:00", day));
    assert_eq!(data["play_date_end"], format!("{} 21:00:00", day));
    assert_eq!(data["players_count"], 1);
    assert_eq!(data["players"][0]["email"], email.as_str());

    let (status, body) = app
        .get(&format!("/api/v1/fields/{}", field_id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["venue_name"], "Stadium");
    assert_eq!(body["data"]["field_type"], "soccer");
    assert_eq!(body["data"]["bookings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn play_window_rules() {
    let app = spawn_app().await;
    let field_id = seeded_field(&app).await;
    let (token, _) = app.signed_in_user("Andi").await;
    let uri = format!("/api/v1/fields/{}/bookings", field_id);

    // Later today is not after today.
    let today = Local::now().date_naive();
    let (status, _) = app
        .post_form(&uri, &window_form(today, "23:58:00", "23:59:00"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post_form(
            &uri,
            "play_date_start=2099-01-01T19:00:00&play_date_end=2099-01-01T21:00:00",
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post_form(&uri, &window_form(day_ahead(2), "21:00:00", "19:00:00"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post_form(
            &format!("/api/v1/fields/{}/bookings", Uuid::new_v4()),
            &window_form(day_ahead(2), "19:00:00", "21:00:00"),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn overlapping_bookings_are_allowed() {
    let app = spawn_app().await;
    let field_id = seeded_field(&app).await;
    let (token, _) = app.signed_in_user("Andi").await;
    let day = day_ahead(4);

    book(&app, &token, &field_id, day).await;
    book(&app, &token, &field_id, day).await;
}

#[tokio::test]
#[ignore]
async fn only_the_booking_owner_may_change_it() {
    let app = spawn_app().await;
    let field_id = seeded_field(&app).await;
    let (owner, _) = app.signed_in_user("Andi").await;
    let (other, _) = app.signed_in_user("Budi").await;
    let booking_id = book(&app, &owner, &field_id, day_ahead(5)).await;
    let uri = format!("/api/v1/bookings/{}", booking_id);
    let moved = window_form(day_ahead(6), "08:00:00", "10:00:00");

    let (status, _) = app.put_form(&uri, &moved, &other).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = app.get(&uri, &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["play_date_start"],
        format!("{} 19:00:00", day_ahead(5))
    );
    let (status, _) = app.delete(&uri, &other).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.put_form(&uri, &moved, &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["play_date_start"],
        format!("{} 08:00:00", day_ahead(6))
    );

    let (status, _) = app.delete(&uri, &owner).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&uri, &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete(&uri, &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn malformed_ids_are_json_bad_requests() {
    let app = spawn_app().await;
    let (token, _) = app.signed_in_user("Eka").await;

    for uri in [
        "/api/v1/bookings/not-a-uuid",
        "/api/v1/fields/not-a-uuid",
    ] {
        let (status, body) = app.get(uri, &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}: {}", uri, body);
    }
}

#[tokio::test]
#[ignore]
async fn join_is_idempotent_and_unjoin_is_safe() {
    let app = spawn_app().await;
    let field_id = seeded_field(&app).await;
    let (owner, _) = app.signed_in_user("Andi").await;
    let (friend, friend_email) = app.signed_in_user("Citra").await;
    let booking_id = book(&app, &owner, &field_id, day_ahead(7)).await;
    let join = format!("/api/v1/bookings/{}/join", booking_id);
    let unjoin = format!("/api/v1/bookings/{}/unjoin", booking_id);

    let (status, body) = app.post_form(&join, "", Some(&friend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["players_count"], 2);
    assert_eq!(body["data"]["players"][1]["email"], friend_email.as_str());

    let (status, body) = app.post_form(&join, "", Some(&friend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["players_count"], 2);

    let (status, body) = app.get("/api/v1/schedules", &friend).await;
    assert_eq!(status, StatusCode::OK);
    let schedules = body["data"].as_array().unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0]["booking_id"], booking_id.as_str());

    let (status, body) = app.post_form(&unjoin, "", Some(&friend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["players_count"], 1);

    let (status, body) = app.post_form(&unjoin, "", Some(&friend)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["players_count"], 1);

    let (_, body) = app.get("/api/v1/schedules", &friend).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let missing = format!("/api/v1/bookings/{}/join", Uuid::new_v4());
    let (status, _) = app.post_form(&missing, "", Some(&friend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn venue_detail_shows_bookings_for_the_requested_day() {
    let app = spawn_app().await;
    let owner = app.signed_in_owner("Owner").await;
    let (player, _) = app.signed_in_user("Dewi").await;

    let (_, body) = app
        .post_form(
            "/api/v1/venues",
            "name=Hall&address=Jl.+Braga&phone=022777",
            Some(&owner),
        )
        .await;
    let venue_id = body["data"]["venue_id"].as_str().unwrap().to_string();
    let (_, body) = app
        .post_form(
            &format!("/api/v1/venues/{}/fields", venue_id),
            "name=Court&type=basketball",
            Some(&owner),
        )
        .await;
    let field_id = body["data"]["field_id"].as_str().unwrap().to_string();

    let day = day_ahead(8);
    book(&app, &player, &field_id, day).await;

    let (status, body) = app
        .get(&format!("/api/v1/venues/{}?date={}", venue_id, day), &owner)
        .await;
    assert_eq!(status, StatusCode::OK);
    let fields = body["data"]["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["bookings"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .get(
            &format!("/api/v1/venues/{}?date={}", venue_id, day_ahead(9)),
            &owner,
        )
        .await;
    assert!(body["data"]["fields"][0]["bookings"]
        .as_array()
        .unwrap()
        .is_empty());

    // Deleting the venue cascades to its fields and bookings.
    let (status, _) = app
        .delete(&format!("/api/v1/venues/{}", venue_id), &owner)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .get(&format!("/api/v1/fields/{}", field_id), &player)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
