//! End-to-end tests of the HTTP surface over the in-memory backends.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use foodapi_api::{AppState, build_router};
use foodapi_auth::{JwtDecoder, JwtEncoder, PasswordHasher, SessionManager, TokenSessions};
use foodapi_cache::memory::MemorySessionStore;
use foodapi_core::config::{AuthConfig, ServerConfig};
use foodapi_core::traits::SystemClock;
use foodapi_core::types::User;
use foodapi_database::InMemoryUserRepository;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "correct horse";

fn app() -> Router {
    let config = AuthConfig {
        access_secret: "access-secret".to_string(),
        refresh_secret: "refresh-secret".to_string(),
        ..AuthConfig::default()
    };
    let clock = Arc::new(SystemClock);
    let store = Arc::new(MemorySessionStore::with_clock(clock.clone()));
    let users = Arc::new(InMemoryUserRepository::new());

    let hasher = PasswordHasher::new();
    users.insert(User {
        id: "user-42".to_string(),
        names: "Ada".to_string(),
        last_names: "Lovelace".to_string(),
        email: EMAIL.to_string(),
        password_hash: hasher.hash_password(PASSWORD).unwrap(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });

    let session_manager = SessionManager::new(
        Arc::new(JwtEncoder::new(&config, clock.clone()).unwrap()),
        Arc::new(JwtDecoder::new(&config)),
        TokenSessions::new(store.clone(), clock),
        users.clone(),
        hasher,
    );

    let state = AppState {
        session_manager: Arc::new(session_manager),
        session_store: store,
        users,
    };
    build_router(state, &ServerConfig::default())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": EMAIL, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body[name].as_str().unwrap()
}

#[tokio::test]
async fn test_login_returns_user_and_tokens() {
    let app = app();
    let body = login(&app).await;

    assert_eq!(body["id"], "user-42");
    assert_eq!(body["names"], "Ada");
    assert_eq!(body["last_names"], "Lovelace");
    assert!(!field(&body, "access_token").is_empty());
    assert!(!field(&body, "refresh_token").is_empty());
}

#[tokio::test]
async fn test_login_wrong_password_is_conflict() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": EMAIL, "password": "nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
    assert_eq!(body["message"], "password does not match");
}

#[tokio::test]
async fn test_login_invalid_body_is_unprocessable() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "not-an-email", "password": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);

    let (status, _) = send(&app, Method::POST, "/api/login", None, Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_refresh_rotates_once() {
    let app = app();
    let p1 = login(&app).await;
    let old_refresh = field(&p1, "refresh_token").to_string();

    let (status, p2) = send(
        &app,
        Method::POST,
        "/api/refresh",
        None,
        Some(json!({"refresh_token": old_refresh, "names": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{p2}");
    assert_eq!(p2["id"], "user-42");
    assert_eq!(p2["names"], "Ada");
    assert_ne!(p2["access_token"], p1["access_token"]);
    assert_ne!(p2["refresh_token"], p1["refresh_token"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/refresh",
        None,
        Some(json!({"refresh_token": old_refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "unauthorized");
}

#[tokio::test]
async fn test_refresh_with_garbage_is_unauthorized() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/refresh",
        None,
        Some(json!({"refresh_token": "not-a-token"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_logout_after_rotation() {
    let app = app();
    let p1 = login(&app).await;
    let (_, p2) = send(
        &app,
        Method::POST,
        "/api/refresh",
        None,
        Some(json!({"refresh_token": field(&p1, "refresh_token")})),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/logout",
        Some(field(&p1, "access_token")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/logout",
        Some(field(&p2, "access_token")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "Successfully logged out");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/logout",
        Some(field(&p2, "access_token")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_header_is_unauthorized() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_protected_routes_require_bearer() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/api/v1/users/user-42", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/session",
        Some("not-a-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_lookup() {
    let app = app();
    let tokens = login(&app).await;
    let access = field(&tokens, "access_token");

    let (status, body) = send(&app, Method::GET, "/api/v1/users/user-42", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], EMAIL);
    assert!(body.get("password_hash").is_none());

    let (status, body) = send(&app, Method::GET, "/api/v1/users/ghost", Some(access), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_session_status_follows_logout() {
    let app = app();
    let tokens = login(&app).await;
    let access = field(&tokens, "access_token");

    let (status, body) = send(&app, Method::GET, "/api/v1/session", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "user-42");
    assert_eq!(body["active"], true);

    let (status, _) = send(&app, Method::POST, "/api/logout", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);

    // The token still verifies; only the store record is gone.
    let (status, body) = send(&app, Method::GET, "/api/v1/session", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["session_store"], "connected");
}
