use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_cell::router::auth_routes;
use shared_database::{ClinicRepository, InMemoryRepository};
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::{TestConfig, TestUser};

struct Fixture {
    config: TestConfig,
    repo: Arc<InMemoryRepository>,
    patient_id: String,
}

impl Fixture {
    async fn new() -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        repo.seed_user("admin@x.com", Some("admin")).await;
        let patient_id = repo.seed_user("patient@x.com", None).await;
        Self {
            config: TestConfig::default(),
            repo,
            patient_id,
        }
    }

    fn app(&self) -> Router {
        auth_routes(self.config.to_state(self.repo.clone()))
    }

    fn token(&self, email: &str) -> String {
        self.config.token_for(&TestUser::patient(email))
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_jwt_issued_for_registered_email() {
    let fixture = Fixture::new().await;

    let response = fixture
        .app()
        .oneshot(request("GET", "/jwt?email=patient@x.com", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["accessToken"].as_str().unwrap();
    let claims = validate_token(token, &fixture.config.jwt_secret).unwrap();
    assert_eq!(claims.email, "patient@x.com");
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
}

#[tokio::test]
async fn test_jwt_refused_for_unknown_email() {
    let fixture = Fixture::new().await;

    let response = fixture
        .app()
        .oneshot(request("GET", "/jwt?email=ghost@x.com", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({ "accessToken": "" }));
}

#[tokio::test]
async fn test_admin_status_check() {
    let fixture = Fixture::new().await;

    let response = fixture
        .app()
        .oneshot(request("GET", "/users/admin/admin@x.com", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "isAdmin": true }));

    for email in ["patient@x.com", "ghost@x.com"] {
        let response = fixture
            .app()
            .oneshot(request("GET", &format!("/users/admin/{}", email), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await, json!({ "isAdmin": false }));
    }
}

#[tokio::test]
async fn test_list_users_requires_admin() {
    let fixture = Fixture::new().await;

    let response = fixture
        .app()
        .oneshot(request("GET", "/users", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = fixture
        .app()
        .oneshot(request("GET", "/users", Some(&fixture.token("patient@x.com")), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = fixture
        .app()
        .oneshot(request("GET", "/users", Some(&fixture.token("admin@x.com")), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

fn new_user() -> Value {
    json!({ "name": "New Patient", "email": "new@x.com", "photoURL": "https://img.example.com/np.png" })
}

#[tokio::test]
async fn test_create_user_is_public() {
    let fixture = Fixture::new().await;

    let response = fixture
        .app()
        .oneshot(request(
            "POST",
            "/users",
            None,
            Some(new_user()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["acknowledged"], true);
    assert!(ack["insertedId"].is_string());

    let stored = fixture.repo.user_by_email("new@x.com").await.unwrap().unwrap();
    let mut stored = serde_json::to_value(stored).unwrap();
    assert_eq!(stored["_id"], ack["insertedId"]);
    stored.as_object_mut().unwrap().remove("_id");
    assert_eq!(stored, new_user());
}

#[tokio::test]
async fn test_promote_by_non_admin_is_forbidden_and_does_not_mutate() {
    let fixture = Fixture::new().await;
    let uri = format!("/users/admin/{}", fixture.patient_id);

    let response = fixture
        .app()
        .oneshot(request("PUT", &uri, Some(&fixture.token("patient@x.com")), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let patient = fixture.repo.user_by_email("patient@x.com").await.unwrap().unwrap();
    assert_eq!(patient.role, None);
}

#[tokio::test]
async fn test_promote_by_admin_sets_role() {
    let fixture = Fixture::new().await;
    let uri = format!("/users/admin/{}", fixture.patient_id);

    let response = fixture
        .app()
        .oneshot(request("PUT", &uri, Some(&fixture.token("admin@x.com")), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let ack = body_json(response).await;
    assert_eq!(ack["matchedCount"], 1);
    assert_eq!(ack["modifiedCount"], 1);
    let patient = fixture.repo.user_by_email("patient@x.com").await.unwrap().unwrap();
    assert_eq!(patient.role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_promote_with_expired_token_is_forbidden() {
    let fixture = Fixture::new().await;
    let token = shared_utils::test_utils::JwtTestUtils::create_expired_token(
        &TestUser::admin("admin@x.com"),
        &fixture.config.jwt_secret,
    );

    let response = fixture
        .app()
        .oneshot(request(
            "PUT",
            &format!("/users/admin/{}", fixture.patient_id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
