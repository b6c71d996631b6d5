//! Route definitions for Friends domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::requests;
use super::middleware::FriendsState;

/// Create friend request routes
pub fn routes() -> Router<FriendsState> {
    Router::new()
        .route(
            "/v1/friend-requests",
            get(requests::list_pending).post(requests::send_request),
        )
        .route(
            "/v1/friend-requests/{id}/accept",
            post(requests::accept_request),
        )
        .route(
            "/v1/friend-requests/{id}",
            delete(requests::delete_request),
        )
}
