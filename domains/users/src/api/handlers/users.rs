//! User profile and identity sync API handlers

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use relay_auth::AuthUser;
use relay_common::{Error, Result, ValidatedJson};
use relay_store::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::UsersState;

/// Request for updating the caller's presence status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Free-form status line (empty clears it)
    pub status: String,
}

/// Payload pushed by the identity provider on sign-up and profile change
#[derive(Debug, Deserialize, Validate)]
pub struct SyncUserRequest {
    /// Opaque subject identifier from the identity provider
    #[validate(length(min = 1, max = 255))]
    pub subject: String,

    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    pub image_url: Option<String>,
}

/// User profile response DTO
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            image_url: u.image_url,
            status: u.status,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Get the caller's own profile
///
/// **GET /v1/users/me**
pub async fn get_me(AuthUser(ctx): AuthUser) -> Result<Json<UserResponse>> {
    Ok(Json(ctx.user.into()))
}

/// Update the caller's presence status
///
/// **PUT /v1/users/me/status**
///
/// An empty status clears the field.
pub async fn update_status(
    AuthUser(ctx): AuthUser,
    State(state): State<UsersState>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UserResponse>> {
    if !req.status.is_empty() {
        User::validate_status(&req.status)?;
    }

    let updated = state
        .store
        .users
        .update_status(ctx.user.id, &req.status)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Upsert a user record from the identity provider
///
/// **POST /v1/users/sync**
///
/// Authorized by the shared sync secret, not a user JWT. Keyed by subject:
/// a known subject gets its profile fields refreshed, an unknown one gets
/// a new record.
pub async fn sync_user(
    State(state): State<UsersState>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<SyncUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    authorize_sync(&state, &headers)?;

    let user = User::new(req.subject, req.username, req.email, req.image_url)?;
    let stored = state.store.users.upsert(&user).await?;

    tracing::info!(user_id = %stored.id, "User record synced");

    Ok((StatusCode::OK, Json(stored.into())))
}

fn authorize_sync(state: &UsersState, headers: &HeaderMap) -> Result<()> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Authentication("Missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Authentication("Invalid authorization format".to_string()))?;

    if token != state.sync_secret {
        return Err(Error::Authentication("Invalid sync secret".to_string()));
    }

    Ok(())
}
