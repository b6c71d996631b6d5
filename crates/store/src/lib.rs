//! Relay document-store query surface
//!
//! The rest of the application talks to persistence exclusively through the
//! traits in this crate: `UserDirectory`, `ConversationStore`, `MessageStore`
//! and `FriendRequestStore`, bundled into a [`Store`] of shared handles.
//!
//! Two backends are provided:
//! - [`postgres`] — production backend over `sqlx`/PostgreSQL
//! - [`memory`] — in-memory backend for tests and local development

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_common::Result;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub mod entities;
pub mod memory;
pub mod postgres;

pub use entities::{Conversation, ConversationMember, FriendRequest, Message, MessageKind, User};
pub use memory::MemoryStore;

/// Lookup of local user records, keyed by internal id or by the opaque
/// subject identifier assigned by the external identity provider.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert or update a user record keyed by subject (identity sync).
    async fn upsert(&self, user: &User) -> Result<User>;

    /// Set the user's presence status; an empty string clears it.
    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>>;
}

/// Conversations and their membership rows.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Conversation>>;

    /// Create a conversation together with one membership row per member.
    /// Atomic: either the conversation and all memberships exist, or none do.
    async fn create(
        &self,
        conversation: &Conversation,
        member_ids: &[Uuid],
    ) -> Result<Conversation>;

    /// All membership rows of one conversation.
    async fn members_of(&self, conversation_id: Uuid) -> Result<Vec<ConversationMember>>;

    /// All membership rows held by one member, in store order.
    async fn memberships_for(&self, member_id: Uuid) -> Result<Vec<ConversationMember>>;

    async fn set_last_message(
        &self,
        conversation_id: Uuid,
        message_id: Option<Uuid>,
    ) -> Result<()>;

    /// Move the member's last-seen marker to the given message.
    async fn mark_read(
        &self,
        conversation_id: Uuid,
        member_id: Uuid,
        message_id: Uuid,
    ) -> Result<()>;
}

/// Messages within conversations.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Message>>;

    async fn create(&self, message: &Message) -> Result<Message>;

    /// Messages of a conversation in creation order.
    async fn list(&self, conversation_id: Uuid, offset: i64, limit: i64) -> Result<Vec<Message>>;

    /// Count messages created strictly after `after` whose sender is not
    /// `exclude_sender`. `after == None` means "since the beginning of time",
    /// i.e. every message not sent by `exclude_sender` counts.
    async fn count_unread(
        &self,
        conversation_id: Uuid,
        exclude_sender: Uuid,
        after: Option<DateTime<Utc>>,
    ) -> Result<i64>;
}

/// Friend requests between users.
#[async_trait]
pub trait FriendRequestStore: Send + Sync {
    async fn create(&self, request: &FriendRequest) -> Result<FriendRequest>;

    async fn find(&self, id: Uuid) -> Result<Option<FriendRequest>>;

    /// Pending requests addressed to a user, newest first.
    async fn pending_for(&self, receiver_id: Uuid) -> Result<Vec<FriendRequest>>;

    /// The request between two users in either direction, if any.
    async fn between(&self, a: Uuid, b: Uuid) -> Result<Option<FriendRequest>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Combined store handles, cloned into each domain state.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserDirectory>,
    pub conversations: Arc<dyn ConversationStore>,
    pub messages: Arc<dyn MessageStore>,
    pub friend_requests: Arc<dyn FriendRequestStore>,
}

impl Store {
    /// PostgreSQL-backed store sharing one connection pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserDirectory::new(pool.clone())),
            conversations: Arc::new(postgres::PgConversationStore::new(pool.clone())),
            messages: Arc::new(postgres::PgMessageStore::new(pool.clone())),
            friend_requests: Arc::new(postgres::PgFriendRequestStore::new(pool)),
        }
    }

    /// In-memory store; every handle views the same data.
    pub fn memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Build a store from an existing [`MemoryStore`], keeping the concrete
    /// handle around for test seeding and corruption helpers.
    pub fn from_memory(mem: Arc<MemoryStore>) -> Self {
        Self {
            users: mem.clone(),
            conversations: mem.clone(),
            messages: mem.clone(),
            friend_requests: mem,
        }
    }
}
