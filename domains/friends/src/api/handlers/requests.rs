//! Friend request API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use relay_auth::AuthUser;
use relay_common::{Error, Result, ValidatedJson};
use relay_store::{Conversation, FriendRequest, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::FriendsState;

/// Request for sending a friend request
#[derive(Debug, Deserialize, Validate)]
pub struct SendFriendRequest {
    /// Email address of the user to befriend
    #[validate(email)]
    pub email: String,
}

/// Sender profile embedded in pending request responses
#[derive(Debug, Serialize)]
pub struct SenderProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl From<User> for SenderProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            image_url: user.image_url,
        }
    }
}

/// Friend request response DTO
#[derive(Debug, Serialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<FriendRequest> for FriendRequestResponse {
    fn from(r: FriendRequest) -> Self {
        Self {
            id: r.id,
            sender_id: r.sender_id,
            receiver_id: r.receiver_id,
            created_at: r.created_at,
        }
    }
}

/// Pending request with the sender's profile resolved
#[derive(Debug, Serialize)]
pub struct PendingRequestResponse {
    pub id: Uuid,
    pub sender: SenderProfile,
    pub created_at: DateTime<Utc>,
}

/// Response for an accepted request
#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub conversation_id: Uuid,
}

/// Send a friend request by email
///
/// **POST /v1/friend-requests**
pub async fn send_request(
    AuthUser(ctx): AuthUser,
    State(state): State<FriendsState>,
    ValidatedJson(req): ValidatedJson<SendFriendRequest>,
) -> Result<(StatusCode, Json<FriendRequestResponse>)> {
    let caller = &ctx.user;

    if req.email.eq_ignore_ascii_case(&caller.email) {
        return Err(Error::Validation(
            "You cannot send a friend request to yourself".to_string(),
        ));
    }

    let receiver = state
        .store
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No user with email {}", req.email)))?;

    // One open request per pair, regardless of direction.
    if state
        .store
        .friend_requests
        .between(caller.id, receiver.id)
        .await?
        .is_some()
    {
        return Err(Error::Conflict(
            "A friend request between these users already exists".to_string(),
        ));
    }

    let request = FriendRequest::new(caller.id, receiver.id)?;
    let created = state.store.friend_requests.create(&request).await?;

    tracing::info!(
        request_id = %created.id,
        receiver_id = %receiver.id,
        "Friend request sent"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List pending requests addressed to the caller, newest first
///
/// **GET /v1/friend-requests**
///
/// Requests whose sender no longer exists are omitted.
pub async fn list_pending(
    AuthUser(ctx): AuthUser,
    State(state): State<FriendsState>,
) -> Result<Json<Vec<PendingRequestResponse>>> {
    let pending = state.store.friend_requests.pending_for(ctx.user.id).await?;

    let mut responses = Vec::with_capacity(pending.len());
    for request in pending {
        if let Some(sender) = state.store.users.find_by_id(request.sender_id).await? {
            responses.push(PendingRequestResponse {
                id: request.id,
                sender: sender.into(),
                created_at: request.created_at,
            });
        }
    }

    Ok(Json(responses))
}

/// Accept a friend request
///
/// **POST /v1/friend-requests/{id}/accept**
///
/// Only the receiver may accept. Accepting opens a 1:1 conversation
/// between the two users and removes the request.
pub async fn accept_request(
    AuthUser(ctx): AuthUser,
    State(state): State<FriendsState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AcceptResponse>)> {
    let request = load_for(&state, id, ctx.user.id).await?;

    if request.receiver_id != ctx.user.id {
        return Err(Error::Authorization(
            "Only the receiver can accept a friend request".to_string(),
        ));
    }

    let conversation = Conversation::direct();
    let created = state
        .store
        .conversations
        .create(&conversation, &[request.sender_id, request.receiver_id])
        .await?;

    state.store.friend_requests.delete(request.id).await?;

    tracing::info!(
        request_id = %request.id,
        conversation_id = %created.id,
        "Friend request accepted"
    );

    Ok((
        StatusCode::CREATED,
        Json(AcceptResponse {
            conversation_id: created.id,
        }),
    ))
}

/// Decline or cancel a friend request
///
/// **DELETE /v1/friend-requests/{id}**
///
/// The receiver declines; the sender cancels. Anyone else gets a 404.
pub async fn delete_request(
    AuthUser(ctx): AuthUser,
    State(state): State<FriendsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let request = load_for(&state, id, ctx.user.id).await?;

    state.store.friend_requests.delete(request.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Load a request, hiding its existence from uninvolved users.
async fn load_for(state: &FriendsState, id: Uuid, caller_id: Uuid) -> Result<FriendRequest> {
    let not_found = || Error::NotFound(format!("Friend request {} not found", id));

    let request = state
        .store
        .friend_requests
        .find(id)
        .await?
        .ok_or_else(not_found)?;

    if request.sender_id != caller_id && request.receiver_id != caller_id {
        return Err(not_found());
    }

    Ok(request)
}
