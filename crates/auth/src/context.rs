//! Authorization context for authenticated callers

use relay_store::User;

/// Represents an authenticated caller: the local user record the
/// identity-provider subject resolved to.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
}

impl AuthContext {
    pub fn new(user: User) -> Self {
        Self { user }
    }
}
