//! JWT claims types

use serde::{Deserialize, Serialize};

/// JWT claims issued by the external identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (opaque identity-provider user id)
    pub sub: String,
    /// Email
    pub email: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    pub aud: Option<String>,
}
