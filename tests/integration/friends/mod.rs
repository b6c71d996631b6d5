//! Friend request endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::common::{authed_request, create_test_jwt, error_code, parse_body, TestApp};

/// Send a request from `sender` to `receiver_email`, returning the id.
async fn send_request(app: &TestApp, jwt: &str, receiver_email: &str) -> Uuid {
    let resp = app
        .request(authed_request(
            Method::POST,
            "/v1/friend-requests",
            jwt,
            Some(json!({"email": receiver_email})),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = parse_body(resp).await;
    body["id"].as_str().unwrap().parse().unwrap()
}

mod test_send_request {
    use super::*;

    #[tokio::test]
    async fn test_send_returns_201() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();

        let id = send_request(&app, &create_test_jwt(&alice), &bob.email).await;
        assert_ne!(id, Uuid::nil());
    }

    #[tokio::test]
    async fn test_self_request_is_rejected() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();

        let resp = app
            .request(authed_request(
                Method::POST,
                "/v1/friend-requests",
                &create_test_jwt(&alice),
                Some(json!({"email": alice.email})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_email_returns_404() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();

        let resp = app
            .request(authed_request(
                Method::POST,
                "/v1/friend-requests",
                &create_test_jwt(&alice),
                Some(json!({"email": "nobody@relay.test"})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_request_conflicts() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();

        send_request(&app, &create_test_jwt(&alice), &bob.email).await;

        let resp = app
            .request(authed_request(
                Method::POST,
                "/v1/friend-requests",
                &create_test_jwt(&alice),
                Some(json!({"email": bob.email})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reverse_direction_also_conflicts() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();

        send_request(&app, &create_test_jwt(&alice), &bob.email).await;

        let resp = app
            .request(authed_request(
                Method::POST,
                "/v1/friend-requests",
                &create_test_jwt(&bob),
                Some(json!({"email": alice.email})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(error_code(resp).await, "CONFLICT");
    }
}

mod test_list_pending {
    use super::*;

    #[tokio::test]
    async fn test_pending_resolves_sender_profiles() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();
        let carol = app.create_test_user("carol").await.unwrap();

        send_request(&app, &create_test_jwt(&bob), &alice.email).await;
        send_request(&app, &create_test_jwt(&carol), &alice.email).await;

        let resp = app
            .request(authed_request(
                Method::GET,
                "/v1/friend-requests",
                &create_test_jwt(&alice),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        let senders: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["sender"]["username"].as_str().unwrap())
            .collect();
        // Newest first.
        assert_eq!(senders, vec!["carol", "bob"]);
    }

    #[tokio::test]
    async fn test_outgoing_requests_are_not_listed() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();

        send_request(&app, &create_test_jwt(&alice), &bob.email).await;

        let resp = app
            .request(authed_request(
                Method::GET,
                "/v1/friend-requests",
                &create_test_jwt(&alice),
                None,
            ))
            .await;
        let body = parse_body(resp).await;
        assert_eq!(body, json!([]));
    }
}

mod test_accept_request {
    use super::*;

    #[tokio::test]
    async fn test_accept_opens_direct_conversation() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();

        let id = send_request(&app, &create_test_jwt(&alice), &bob.email).await;

        let bob_jwt = create_test_jwt(&bob);
        let resp = app
            .request(authed_request(
                Method::POST,
                &format!("/v1/friend-requests/{}/accept", id),
                &bob_jwt,
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = parse_body(resp).await;
        let conversation_id = body["conversation_id"].as_str().unwrap();

        // Both users now see the 1:1 conversation.
        for (user, peer) in [(&alice, "bob"), (&bob, "alice")] {
            let resp = app
                .request(authed_request(
                    Method::GET,
                    "/v1/conversations",
                    &create_test_jwt(user),
                    None,
                ))
                .await;
            let list = parse_body(resp).await;
            assert_eq!(list[0]["id"].as_str().unwrap(), conversation_id);
            assert_eq!(list[0]["other_member"]["username"], peer);
        }

        // The request is consumed.
        let resp = app
            .request(authed_request(Method::GET, "/v1/friend-requests", &bob_jwt, None))
            .await;
        assert_eq!(parse_body(resp).await, json!([]));
    }

    #[tokio::test]
    async fn test_sender_cannot_accept_own_request() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();

        let id = send_request(&app, &create_test_jwt(&alice), &bob.email).await;

        let resp = app
            .request(authed_request(
                Method::POST,
                &format!("/v1/friend-requests/{}/accept", id),
                &create_test_jwt(&alice),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_uninvolved_user_gets_404() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();
        let eve = app.create_test_user("eve").await.unwrap();

        let id = send_request(&app, &create_test_jwt(&alice), &bob.email).await;

        let resp = app
            .request(authed_request(
                Method::POST,
                &format!("/v1/friend-requests/{}/accept", id),
                &create_test_jwt(&eve),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

mod test_delete_request {
    use super::*;

    #[tokio::test]
    async fn test_receiver_declines() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();

        let id = send_request(&app, &create_test_jwt(&alice), &bob.email).await;

        let resp = app
            .request(authed_request(
                Method::DELETE,
                &format!("/v1/friend-requests/{}", id),
                &create_test_jwt(&bob),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        // Declining allows a fresh request later.
        send_request(&app, &create_test_jwt(&alice), &bob.email).await;
    }

    #[tokio::test]
    async fn test_sender_cancels() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();
        let bob = app.create_test_user("bob").await.unwrap();

        let id = send_request(&app, &create_test_jwt(&alice), &bob.email).await;

        let resp = app
            .request(authed_request(
                Method::DELETE,
                &format!("/v1/friend-requests/{}", id),
                &create_test_jwt(&alice),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_missing_request_returns_404() {
        let app = TestApp::new();
        let alice = app.create_test_user("alice").await.unwrap();

        let resp = app
            .request(authed_request(
                Method::DELETE,
                &format!("/v1/friend-requests/{}", Uuid::new_v4()),
                &create_test_jwt(&alice),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
