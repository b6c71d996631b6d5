//! User profile and identity sync endpoint integration tests

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;

use relay_store::UserDirectory;

use crate::common::{
    anon_request, authed_request, create_test_jwt, parse_body, TestApp, TEST_SYNC_SECRET,
};

/// Build a sync request authorized with the given secret.
fn sync_request(secret: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/v1/users/sync")
        .header("authorization", format!("Bearer {}", secret))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

mod test_me {
    use super::*;

    #[tokio::test]
    async fn test_get_me_returns_profile() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();

        let resp = app
            .request(authed_request(
                Method::GET,
                "/v1/users/me",
                &create_test_jwt(&alice),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["email"], "alice@relay.test");
        assert!(body["status"].is_null());
    }

    #[tokio::test]
    async fn test_update_status_roundtrip() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let jwt = create_test_jwt(&alice);

        let resp = app
            .request(authed_request(
                Method::PUT,
                "/v1/users/me/status",
                &jwt,
                Some(json!({"status": "out for lunch"})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .request(authed_request(Method::GET, "/v1/users/me", &jwt, None))
            .await;
        let body = parse_body(resp).await;
        assert_eq!(body["status"], "out for lunch");
    }

    #[tokio::test]
    async fn test_empty_status_clears_it() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let jwt = create_test_jwt(&alice);

        app.request(authed_request(
            Method::PUT,
            "/v1/users/me/status",
            &jwt,
            Some(json!({"status": "around"})),
        ))
        .await;

        let resp = app
            .request(authed_request(
                Method::PUT,
                "/v1/users/me/status",
                &jwt,
                Some(json!({"status": ""})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        assert!(body["status"].is_null());
    }

    #[tokio::test]
    async fn test_whitespace_status_is_rejected() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();

        let resp = app
            .request(authed_request(
                Method::PUT,
                "/v1/users/me/status",
                &create_test_jwt(&alice),
                Some(json!({"status": "   "})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_overlong_status_is_rejected() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();

        let resp = app
            .request(authed_request(
                Method::PUT,
                "/v1/users/me/status",
                &create_test_jwt(&alice),
                Some(json!({"status": "x".repeat(200)})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

mod test_sync {
    use super::*;

    #[tokio::test]
    async fn test_sync_creates_user() {
        let app = TestApp::new();

        let resp = app
            .request(sync_request(
                TEST_SYNC_SECRET,
                json!({
                    "subject": "idp|new-user",
                    "username": "newcomer",
                    "email": "newcomer@relay.test"
                }),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        assert_eq!(body["username"], "newcomer");
    }

    #[tokio::test]
    async fn test_sync_updates_existing_subject() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();

        let resp = app
            .request(sync_request(
                TEST_SYNC_SECRET,
                json!({
                    "subject": alice.subject,
                    "username": "alice-renamed",
                    "email": alice.email,
                    "image_url": "https://cdn.relay.test/alice.png"
                }),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        // Same record, refreshed profile fields.
        assert_eq!(body["id"].as_str().unwrap(), alice.id.to_string());
        assert_eq!(body["username"], "alice-renamed");
    }

    #[tokio::test]
    async fn test_wrong_secret_is_unauthorized() {
        let app = TestApp::new();

        let resp = app
            .request(sync_request(
                "wrong-secret",
                json!({
                    "subject": "idp|x",
                    "username": "x",
                    "email": "x@relay.test"
                }),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_authorization_is_unauthorized() {
        let app = TestApp::new();

        let resp = app
            .request(anon_request(
                Method::POST,
                "/v1/users/sync",
                Some(json!({
                    "subject": "idp|x",
                    "username": "x",
                    "email": "x@relay.test"
                })),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_synced_user_can_authenticate() {
        let app = TestApp::new();

        app.request(sync_request(
            TEST_SYNC_SECRET,
            json!({
                "subject": "idp|fresh",
                "username": "fresh",
                "email": "fresh@relay.test"
            }),
        ))
        .await;

        let user = app
            .store
            .users
            .find_by_subject("idp|fresh")
            .await
            .unwrap()
            .unwrap();

        let resp = app
            .request(authed_request(
                Method::GET,
                "/v1/users/me",
                &create_test_jwt(&user),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
