//! Friends domain state and auth backend integration

use axum::extract::FromRef;
use relay_auth::AuthBackend;
use relay_store::Store;

/// Application state for the Friends domain
#[derive(Clone)]
pub struct FriendsState {
    pub store: Store,
    pub auth: AuthBackend,
}

impl FromRef<FriendsState> for AuthBackend {
    fn from_ref(state: &FriendsState) -> Self {
        state.auth.clone()
    }
}
