use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use shared_database::{ClinicRepository, InMemoryRepository};
use shared_utils::test_utils::{booking_for, sample_treatment_options, TestConfig, TestUser};

async fn seeded_repo() -> Arc<InMemoryRepository> {
    let repo = Arc::new(InMemoryRepository::with_treatment_options(
        sample_treatment_options(),
    ));
    for booking in [
        booking_for("a@x.com", "Teeth Orthodontics", "Oct 17, 2026", "10:00"),
        booking_for("b@x.com", "Teeth Orthodontics", "Oct 17, 2026", "09:00"),
        booking_for("a@x.com", "Teeth Cleaning", "Oct 18, 2026", "08:00"),
    ] {
        repo.insert_booking(booking).await.unwrap();
    }
    repo
}

fn create_test_app(config: &TestConfig, repo: Arc<InMemoryRepository>) -> Router {
    appointment_routes(config.to_state(repo))
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_appointment_options_remove_booked_slots() {
    let config = TestConfig::default();
    let app = create_test_app(&config, seeded_repo().await);

    let response = app
        .oneshot(get("/appointmentOptions?date=Oct%2017,%202026", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let options = body_json(response).await;
    assert_eq!(options[0]["name"], "Teeth Orthodontics");
    assert_eq!(options[0]["slots"], json!(["11:00"]));
    assert_eq!(options[1]["slots"], json!(["09:00", "10:00"]));
    assert_eq!(options[2]["slots"], json!(["08:00", "08:30", "09:00", "09:30"]));
}

#[tokio::test]
async fn test_v2_appointment_options_match_v1() {
    let config = TestConfig::default();
    let repo = seeded_repo().await;

    for date in ["Oct%2017,%202026", "Oct%2018,%202026", "Jan%201,%202027"] {
        let v1 = create_test_app(&config, repo.clone())
            .oneshot(get(&format!("/appointmentOptions?date={}", date), None))
            .await
            .unwrap();
        let v2 = create_test_app(&config, repo.clone())
            .oneshot(get(&format!("/v2/appointmentOptions?date={}", date), None))
            .await
            .unwrap();

        assert_eq!(body_json(v1).await, body_json(v2).await);
    }
}

#[tokio::test]
async fn test_appointment_specialty_lists_names_only() {
    let config = TestConfig::default();
    let app = create_test_app(&config, seeded_repo().await);

    let response = app.oneshot(get("/appointmentSpecialty", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let names = body_json(response).await;
    assert_eq!(names.as_array().unwrap().len(), 3);
    assert_eq!(names[0]["name"], "Teeth Orthodontics");
    assert!(names[0].get("slots").is_none());
    assert!(names[0].get("_id").is_some());
}

#[tokio::test]
async fn test_patient_bookings_require_token() {
    let config = TestConfig::default();
    let app = create_test_app(&config, seeded_repo().await);

    let response = app
        .oneshot(get("/bookings?email=a@x.com", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_patient_bookings_are_self_scoped() {
    let config = TestConfig::default();
    let app = create_test_app(&config, seeded_repo().await);
    let token = config.token_for(&TestUser::patient("b@x.com"));

    let response = app
        .oneshot(get("/bookings?email=a@x.com", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patient_bookings_return_only_own() {
    let config = TestConfig::default();
    let app = create_test_app(&config, seeded_repo().await);
    let token = config.token_for(&TestUser::patient("a@x.com"));

    let response = app
        .oneshot(get("/bookings?email=a@x.com", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bookings = body_json(response).await;
    let bookings = bookings.as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert!(bookings.iter().all(|b| b["email"] == "a@x.com"));
}

#[tokio::test]
async fn test_create_booking_then_fetch_by_id() {
    let config = TestConfig::default();
    let repo = seeded_repo().await;
    let posted = json!({
        "appointmentDate": "Oct 19, 2026",
        "treatment": "Cosmetic Dentistry",
        "patientName": "Carol",
        "slot": "09:00",
        "email": "c@x.com",
        "phone": "555-0199",
        "price": 99.5,
        "referral": "newsletter"
    });

    let response = create_test_app(&config, repo.clone())
        .oneshot(post_json("/bookings", posted.clone()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["acknowledged"], true);
    let id = ack["insertedId"].as_str().unwrap().to_string();

    let response = create_test_app(&config, repo)
        .oneshot(get(&format!("/bookings/{}", id), None))
        .await
        .unwrap();
    let mut booking = body_json(response).await;
    assert_eq!(booking["_id"], id);

    // Everything but the assigned id comes back under the posted names.
    booking.as_object_mut().unwrap().remove("_id");
    assert_eq!(booking, posted);
}

#[tokio::test]
async fn test_duplicate_booking_is_acknowledged_false() {
    let config = TestConfig::default();
    let repo = seeded_repo().await;
    let app = create_test_app(&config, repo.clone());

    let response = app
        .oneshot(post_json(
            "/bookings",
            json!({
                "appointmentDate": "Oct 17, 2026",
                "treatment": "Teeth Orthodontics",
                "slot": "11:00",
                "email": "a@x.com"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["acknowledged"], false);
    assert_eq!(
        ack["message"],
        "You have already booked the treatment for Oct 17, 2026"
    );
    assert_eq!(repo.booking_count().await, 3);
}

#[tokio::test]
async fn test_unknown_booking_is_null() {
    let config = TestConfig::default();
    let app = create_test_app(&config, seeded_repo().await);

    let response = app.oneshot(get("/bookings/does-not-exist", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::Null);
}
