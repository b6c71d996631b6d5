//! Conversations domain state and auth backend integration

use axum::extract::FromRef;
use relay_auth::AuthBackend;
use relay_store::Store;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub store: Store,
    pub auth: AuthBackend,
}

impl FromRef<ConversationsState> for AuthBackend {
    fn from_ref(state: &ConversationsState) -> Self {
        state.auth.clone()
    }
}
