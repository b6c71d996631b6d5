//! Authentication configuration

/// Settings for validating identity-provider JWTs.
///
/// Relay does not mint tokens itself; users authenticate against the
/// external identity provider and present its HS256-signed JWT. Issuer and
/// audience checks are skipped when unset.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}
