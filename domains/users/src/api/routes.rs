//! Route definitions for Users domain API

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::users;
use super::middleware::UsersState;

/// Create all Users domain API routes
pub fn routes() -> Router<UsersState> {
    Router::new()
        .route("/v1/users/me", get(users::get_me))
        .route("/v1/users/me/status", put(users::update_status))
        .route("/v1/users/sync", post(users::sync_user))
}
