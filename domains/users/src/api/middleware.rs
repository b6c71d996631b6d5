//! Users domain state and auth backend integration

use axum::extract::FromRef;
use relay_auth::AuthBackend;
use relay_store::Store;

/// Application state for the Users domain
#[derive(Clone)]
pub struct UsersState {
    pub store: Store,
    pub auth: AuthBackend,
    /// Shared secret authorizing the identity provider's sync webhook.
    pub sync_secret: String,
}

impl FromRef<UsersState> for AuthBackend {
    fn from_ref(state: &UsersState) -> Self {
        state.auth.clone()
    }
}
