//! Authentication middleware for the Relay API
//!
//! Validates identity-provider JWTs, resolves the opaque subject to a local
//! user record, and provides the `AuthUser` axum extractor that works with
//! any domain state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;

pub use backend::AuthBackend;
pub use claims::IdentityClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::AuthUser;
