//! Conversation management API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use relay_auth::AuthUser;
use relay_common::{Error, Result, ValidatedJson};
use relay_store::{Conversation, Store, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::domain::summary::{build_summaries, MessagePreview};

/// Request for creating a group conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    /// Group display name (1-100 chars)
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Members to add besides the caller
    #[validate(length(min = 1, message = "At least one other member is required"))]
    pub member_ids: Vec<Uuid>,
}

/// Request for moving the caller's read marker
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub message_id: Uuid,
}

/// Public user profile embedded in conversation responses
#[derive(Debug, Serialize)]
pub struct MemberProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

impl From<User> for MemberProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            image_url: user.image_url,
            status: user.status,
        }
    }
}

/// One entry of the conversation list
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub id: Uuid,
    pub is_group: bool,
    pub name: Option<String>,
    pub other_member: Option<MemberProfile>,
    pub unread_count: i64,
    pub last_message: Option<MessagePreview>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation detail with the full member list
#[derive(Debug, Serialize)]
pub struct ConversationDetailResponse {
    pub id: Uuid,
    pub is_group: bool,
    pub name: Option<String>,
    pub members: Vec<MemberProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation response for create operations
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub is_group: bool,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            is_group: c.is_group,
            name: c.name,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// List the caller's conversations with unread counts and previews
///
/// **GET /v1/conversations**
pub async fn list_conversations(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<Json<Vec<SummaryResponse>>> {
    let summaries = build_summaries(&state.store, &ctx.user)
        .await
        .map_err(Error::from)?;

    let responses = summaries
        .into_iter()
        .map(|s| SummaryResponse {
            id: s.conversation.id,
            is_group: s.conversation.is_group,
            name: s.conversation.name,
            other_member: s.other_member.map(MemberProfile::from),
            unread_count: s.unread_count,
            last_message: s.last_message,
            created_at: s.conversation.created_at,
            updated_at: s.conversation.updated_at,
        })
        .collect();

    Ok(Json(responses))
}

/// Create a group conversation
///
/// **POST /v1/conversations**
///
/// The caller is always a member; `member_ids` lists the others. Every
/// listed member must exist.
pub async fn create_group(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>)> {
    let caller = &ctx.user;

    let mut member_ids: Vec<Uuid> = vec![caller.id];
    for id in &req.member_ids {
        if *id == caller.id {
            continue;
        }
        state
            .store
            .users
            .find_by_id(*id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))?;
        if !member_ids.contains(id) {
            member_ids.push(*id);
        }
    }

    if member_ids.len() < 2 {
        return Err(Error::Validation(
            "A group needs at least one other member".to_string(),
        ));
    }

    let conversation = Conversation::group(req.name)?;
    let created = state
        .store
        .conversations
        .create(&conversation, &member_ids)
        .await?;

    tracing::info!(
        conversation_id = %created.id,
        member_count = member_ids.len(),
        "Group conversation created"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get one conversation with its member profiles
///
/// **GET /v1/conversations/{id}**
///
/// Non-members get the same 404 as a missing conversation.
pub async fn get_conversation(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationDetailResponse>> {
    let conversation = require_member(&state.store, id, ctx.user.id).await?;

    let member_rows = state.store.conversations.members_of(id).await?;
    let mut members = Vec::with_capacity(member_rows.len());
    for row in member_rows {
        // Deleted profiles are skipped rather than failing the detail view.
        if let Some(user) = state.store.users.find_by_id(row.member_id).await? {
            members.push(MemberProfile::from(user));
        }
    }

    Ok(Json(ConversationDetailResponse {
        id: conversation.id,
        is_group: conversation.is_group,
        name: conversation.name,
        members,
        created_at: conversation.created_at,
        updated_at: conversation.updated_at,
    }))
}

/// Move the caller's read marker to a message
///
/// **POST /v1/conversations/{id}/read**
pub async fn mark_read(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MarkReadRequest>,
) -> Result<StatusCode> {
    require_member(&state.store, id, ctx.user.id).await?;

    let message = state
        .store
        .messages
        .find(req.message_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Message {} not found", req.message_id)))?;

    if message.conversation_id != id {
        return Err(Error::Validation(
            "Message does not belong to this conversation".to_string(),
        ));
    }

    state
        .store
        .conversations
        .mark_read(id, ctx.user.id, message.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Load a conversation and verify the caller is a member.
pub(super) async fn require_member(
    store: &Store,
    conversation_id: Uuid,
    caller_id: Uuid,
) -> Result<Conversation> {
    let not_found = || Error::NotFound(format!("Conversation {} not found", conversation_id));

    let conversation = store
        .conversations
        .find(conversation_id)
        .await?
        .ok_or_else(not_found)?;

    let members = store.conversations.members_of(conversation_id).await?;
    if !members.iter().any(|m| m.member_id == caller_id) {
        return Err(not_found());
    }

    Ok(conversation)
}
