//! Relay application composition root
//!
//! Composes all domain routers into a single application.

use axum::Router;
use relay_auth::{AuthBackend, AuthConfig};
use relay_common::Config;
use relay_conversations::ConversationsState;
use relay_friends::FriendsState;
use relay_store::Store;
use relay_users::UsersState;

/// Create the main application router with all routes and middleware
pub fn create_app(config: &Config, store: Store) -> Router {
    let auth_config = AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
    };
    let auth = AuthBackend::new(store.users.clone(), auth_config);

    let conversations_state = ConversationsState {
        store: store.clone(),
        auth: auth.clone(),
    };
    let friends_state = FriendsState {
        store: store.clone(),
        auth: auth.clone(),
    };
    let users_state = UsersState {
        store,
        auth,
        sync_secret: config.identity_sync_secret.clone(),
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Relay API" }))
        .merge(relay_conversations::routes().with_state(conversations_state))
        .merge(relay_friends::routes().with_state(friends_state))
        .merge(relay_users::routes().with_state(users_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
