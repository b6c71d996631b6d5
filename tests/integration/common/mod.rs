//! Common test utilities and fixtures for integration tests
//!
//! Every test runs the real application router over an in-memory store,
//! so the whole suite is self-contained: no database, no network.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use relay_auth::IdentityClaims;
use relay_common::Config;
use relay_store::{MemoryStore, Store, User, UserDirectory};

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only";
pub const TEST_SYNC_SECRET: &str = "test_sync_secret";

/// Test application: the composed router plus a handle on the backing
/// store for seeding and corruption.
pub struct TestApp {
    pub mem: Arc<MemoryStore>,
    pub store: Store,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config {
            database_url: "postgresql://unused".to_string(),
            store_backend: "memory".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_issuer: None,
            jwt_audience: None,
            identity_sync_secret: TEST_SYNC_SECRET.to_string(),
            rust_log: "relay=debug".to_string(),
            port: 0,
        };

        let mem = Arc::new(MemoryStore::new());
        let store = Store::from_memory(mem.clone());
        let router = relay_app::create_app(&config, store.clone());

        Self { mem, store, router }
    }

    /// Create a user record directly in the store.
    pub async fn create_test_user(&self, name: &str) -> Result<User> {
        let user = User::new(
            format!("idp|{}", name),
            name.to_string(),
            format!("{}@relay.test", name),
            None,
        )?;
        Ok(self.mem.upsert(&user).await?)
    }

    /// Dispatch one request through the router.
    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }
}

/// Mint a JWT for a test user, signed with the test secret.
pub fn create_test_jwt(user: &User) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let claims = IdentityClaims {
        sub: user.subject.clone(),
        email: Some(user.email.clone()),
        iat: now,
        exp: now + 3600,
        aud: None,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Build an authenticated JSON request.
pub fn authed_request(method: Method, uri: &str, jwt: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", jwt));

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Build an unauthenticated request.
pub fn anon_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Parse a response body as JSON.
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Assert the standard error envelope and return its code.
pub async fn error_code(response: Response<Body>) -> String {
    let body = parse_body(response).await;
    body["error"]["code"]
        .as_str()
        .expect("error envelope with code")
        .to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();
    let resp = app
        .request(anon_request(Method::GET, "/health", None))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();
    let resp = app
        .request(anon_request(Method::GET, "/v1/conversations", None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_subject_is_unauthorized() {
    let app = TestApp::new();

    // Valid signature, but no user record behind the subject.
    let ghost = User::new(
        "idp|ghost".to_string(),
        "ghost".to_string(),
        "ghost@relay.test".to_string(),
        None,
    )
    .unwrap();
    let jwt = create_test_jwt(&ghost);

    let resp = app
        .request(authed_request(Method::GET, "/v1/conversations", &jwt, None))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(resp).await, "USER_NOT_FOUND");
}
