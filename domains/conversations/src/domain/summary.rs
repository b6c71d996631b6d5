//! Conversation summary aggregation
//!
//! Produces the enriched conversation list shown in the sidebar: one entry
//! per membership the caller holds, each carrying an unread count, a
//! last-message preview, and (for 1:1 conversations) the peer's profile.
//!
//! Failure policy: a membership pointing at a missing conversation, or a
//! 1:1 conversation without a second member, is store corruption and aborts
//! the whole aggregation. A deleted last message, deleted sender, or deleted
//! peer profile degrades that one conversation's fields to `None` instead.

use chrono::{DateTime, Utc};
use futures::future;
use serde::Serialize;
use uuid::Uuid;

use relay_common::Error;
use relay_store::{Conversation, ConversationMember, Store, User};

/// Preview of a conversation's most recent message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePreview {
    pub sender_username: String,
    /// Display text derived from the message kind: raw content for text,
    /// a fixed icon label for attachments, a generic label otherwise.
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// One conversation enriched for the conversation list
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    /// The peer's profile for 1:1 conversations. `None` for groups, and for
    /// 1:1 conversations whose peer's user record has been deleted.
    pub other_member: Option<User>,
    pub unread_count: i64,
    pub last_message: Option<MessagePreview>,
}

/// Hard failures of the aggregation. Both variants indicate the store
/// contradicts its own invariants; callers receive no partial results.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Membership references missing conversation {0}")]
    ConversationNotFound(Uuid),

    #[error("1:1 conversation {0} has no other member")]
    PeerNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] Error),
}

impl From<SummaryError> for Error {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::ConversationNotFound(_) | SummaryError::PeerNotFound(_) => {
                Error::Integrity(err.to_string())
            }
            SummaryError::Store(e) => e,
        }
    }
}

/// Build the caller's conversation summaries.
///
/// One summary per membership, in the order the store returned the
/// memberships. Per-conversation enrichment is independent and runs
/// concurrently; the join preserves order and the first hard error aborts
/// the whole batch. Read-only.
pub async fn build_summaries(
    store: &Store,
    caller: &User,
) -> Result<Vec<ConversationSummary>, SummaryError> {
    let memberships = store.conversations.memberships_for(caller.id).await?;

    future::try_join_all(
        memberships
            .iter()
            .map(|membership| summarize_conversation(store, caller, membership)),
    )
    .await
}

async fn summarize_conversation(
    store: &Store,
    caller: &User,
    membership: &ConversationMember,
) -> Result<ConversationSummary, SummaryError> {
    let conversation = store
        .conversations
        .find(membership.conversation_id)
        .await?
        .ok_or(SummaryError::ConversationNotFound(
            membership.conversation_id,
        ))?;

    let members = store.conversations.members_of(conversation.id).await?;

    let last_message = resolve_preview(store, conversation.last_message_id).await?;

    // The unread scan depends on the threshold; everything above it does not.
    let threshold = last_seen_threshold(store, membership).await?;
    let unread_count = store
        .messages
        .count_unread(conversation.id, caller.id, threshold)
        .await?;

    let other_member = if conversation.is_group {
        None
    } else {
        let peer = members
            .iter()
            .find(|m| m.member_id != caller.id)
            .ok_or(SummaryError::PeerNotFound(conversation.id))?;

        // A deleted peer profile is tolerated; the dangling membership is not.
        store.users.find_by_id(peer.member_id).await?
    };

    Ok(ConversationSummary {
        conversation,
        other_member,
        unread_count,
        last_message,
    })
}

/// Resolve the last-message preview. A conversation without a last message,
/// a deleted message, or a deleted sender all yield `None`.
async fn resolve_preview(
    store: &Store,
    last_message_id: Option<Uuid>,
) -> Result<Option<MessagePreview>, SummaryError> {
    let Some(message_id) = last_message_id else {
        return Ok(None);
    };

    let Some(message) = store.messages.find(message_id).await? else {
        return Ok(None);
    };

    let Some(sender) = store.users.find_by_id(message.sender_id).await? else {
        return Ok(None);
    };

    Ok(Some(MessagePreview {
        sender_username: sender.username,
        content: message.kind.preview_label(&message.content),
        sent_at: message.created_at,
    }))
}

/// The caller's last-seen threshold for one conversation.
///
/// `None` means "never seen": either the marker is unset or the message it
/// points at has been deleted. `None` sorts before every real timestamp, so
/// every message counts as unread.
async fn last_seen_threshold(
    store: &Store,
    membership: &ConversationMember,
) -> Result<Option<DateTime<Utc>>, SummaryError> {
    let Some(message_id) = membership.last_seen_message_id else {
        return Ok(None);
    };

    Ok(store
        .messages
        .find(message_id)
        .await?
        .map(|m| m.created_at))
}
