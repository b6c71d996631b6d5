//! Message API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use relay_auth::AuthUser;
use relay_common::{Pagination, Result, ValidatedJson};
use relay_store::{Message, MessageKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::conversations::require_member;
use crate::api::middleware::ConversationsState;

/// Request for sending a message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Message kind; defaults to "text"
    pub kind: Option<String>,

    /// Message body: text for text messages, a storage URL otherwise
    #[validate(length(min = 1, max = 10_000))]
    pub content: String,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub kind: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            sender_id: m.sender_id,
            kind: m.kind.as_str().to_string(),
            content: m.content,
            created_at: m.created_at,
        }
    }
}

/// List messages of a conversation in creation order
///
/// **GET /v1/conversations/{id}/messages**
pub async fn list_messages(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<MessageResponse>>> {
    require_member(&state.store, id, ctx.user.id).await?;

    let messages = state
        .store
        .messages
        .list(id, pagination.offset(), pagination.limit())
        .await?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Send a message to a conversation
///
/// **POST /v1/conversations/{id}/messages**
///
/// Also advances the conversation's last-message reference.
pub async fn send_message(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    require_member(&state.store, id, ctx.user.id).await?;

    let kind = MessageKind::from(req.kind.unwrap_or_else(|| "text".to_string()));
    let message = Message::new(id, ctx.user.id, kind, req.content)?;

    let created = state.store.messages.create(&message).await?;
    state
        .store
        .conversations
        .set_last_message(id, Some(created.id))
        .await?;

    tracing::debug!(
        conversation_id = %id,
        message_id = %created.id,
        "Message sent"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}
