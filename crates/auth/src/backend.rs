//! Concrete authentication backend
//!
//! Wraps the user directory plus `AuthConfig`. Resolves the JWT subject to
//! a local user record; a valid token whose subject has never been synced
//! is rejected with `UserNotFound` rather than provisioned on the fly —
//! user records are owned by the identity-sync collaborator.

use std::sync::Arc;

use relay_store::UserDirectory;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    directory: Arc<dyn UserDirectory>,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(directory: Arc<dyn UserDirectory>, config: AuthConfig) -> Self {
        Self { directory, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Shared JWT authentication logic used by the `AuthUser` extractor.
    pub(crate) async fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;

        let user = self
            .directory
            .find_by_subject(&claims.sub)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, subject = %claims.sub, "Failed to load user");
                AuthError::UserLoadError
            })?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthContext::new(user))
    }
}
