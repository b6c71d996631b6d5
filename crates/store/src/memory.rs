//! In-memory store backend
//!
//! Backs tests and local development. All four store traits are implemented
//! on one structure so every handle sees the same data. Inherent methods
//! expose direct row manipulation for test seeding and for simulating
//! store corruption (dangling references, deleted rows).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_common::{RepositoryError, Result};
use uuid::Uuid;

use crate::entities::{Conversation, ConversationMember, FriendRequest, Message, User};
use crate::{ConversationStore, FriendRequestStore, MessageStore, UserDirectory};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    conversations: Vec<Conversation>,
    members: Vec<ConversationMember>,
    messages: Vec<Message>,
    friend_requests: Vec<FriendRequest>,
}

/// In-memory document store. Insertion order is the store order.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panicked test thread; propagating the
        // panic here is the right behavior.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Remove a conversation row, leaving memberships behind (simulates a
    /// dangling membership reference).
    pub fn remove_conversation(&self, id: Uuid) {
        self.lock().conversations.retain(|c| c.id != id);
    }

    /// Remove one membership row (simulates a 1:1 conversation losing its
    /// peer).
    pub fn remove_membership(&self, conversation_id: Uuid, member_id: Uuid) {
        self.lock()
            .members
            .retain(|m| !(m.conversation_id == conversation_id && m.member_id == member_id));
    }

    /// Remove a message row without touching references to it.
    pub fn remove_message(&self, id: Uuid) {
        self.lock().messages.retain(|m| m.id != id);
    }

    /// Remove a user row without touching memberships or messages.
    pub fn remove_user(&self, id: Uuid) {
        self.lock().users.retain(|u| u.id != id);
    }

    /// Insert a membership row directly, bypassing conversation creation.
    pub fn insert_membership(&self, member: ConversationMember) {
        self.lock().members.push(member);
    }

    /// Insert a message row with a caller-chosen timestamp.
    pub fn insert_message(&self, message: Message) {
        self.lock().messages.push(message);
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.subject == subject)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn upsert(&self, user: &User) -> Result<User> {
        let mut inner = self.lock();

        // email is unique across subjects; find_by_email must stay
        // deterministic.
        if inner
            .users
            .iter()
            .any(|u| u.email == user.email && u.subject != user.subject)
        {
            return Err(RepositoryError::AlreadyExists.into());
        }

        if let Some(existing) = inner.users.iter_mut().find(|u| u.subject == user.subject) {
            existing.username = user.username.clone();
            existing.email = user.email.clone();
            existing.image_url = user.image_url.clone();
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        inner.users.push(user.clone());
        Ok(user.clone())
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>> {
        let mut inner = self.lock();
        match inner.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.status = if status.is_empty() {
                    None
                } else {
                    Some(status.to_string())
                };
                user.updated_at = Utc::now();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Conversation>> {
        Ok(self
            .lock()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(
        &self,
        conversation: &Conversation,
        member_ids: &[Uuid],
    ) -> Result<Conversation> {
        let mut inner = self.lock();

        // (member_id, conversation_id) uniqueness, checked before any write
        // so a failed create leaves no partial state.
        let mut rows = Vec::with_capacity(member_ids.len());
        for member_id in member_ids {
            if rows
                .iter()
                .any(|r: &ConversationMember| r.member_id == *member_id)
            {
                return Err(RepositoryError::AlreadyExists.into());
            }
            rows.push(ConversationMember::new(conversation.id, *member_id));
        }

        inner.conversations.push(conversation.clone());
        inner.members.extend(rows);
        Ok(conversation.clone())
    }

    async fn members_of(&self, conversation_id: Uuid) -> Result<Vec<ConversationMember>> {
        Ok(self
            .lock()
            .members
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn memberships_for(&self, member_id: Uuid) -> Result<Vec<ConversationMember>> {
        Ok(self
            .lock()
            .members
            .iter()
            .filter(|m| m.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn set_last_message(
        &self,
        conversation_id: Uuid,
        message_id: Option<Uuid>,
    ) -> Result<()> {
        let mut inner = self.lock();
        let conv = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
            .ok_or(RepositoryError::NotFound)?;
        conv.last_message_id = message_id;
        conv.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_read(
        &self,
        conversation_id: Uuid,
        member_id: Uuid,
        message_id: Uuid,
    ) -> Result<()> {
        let mut inner = self.lock();
        let member = inner
            .members
            .iter_mut()
            .find(|m| m.conversation_id == conversation_id && m.member_id == member_id)
            .ok_or(RepositoryError::NotFound)?;
        member.last_seen_message_id = Some(message_id);
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Message>> {
        Ok(self.lock().messages.iter().find(|m| m.id == id).cloned())
    }

    async fn create(&self, message: &Message) -> Result<Message> {
        self.lock().messages.push(message.clone());
        Ok(message.clone())
    }

    async fn list(&self, conversation_id: Uuid, offset: i64, limit: i64) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .lock()
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);

        Ok(messages
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_unread(
        &self,
        conversation_id: Uuid,
        exclude_sender: Uuid,
        after: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let count = self
            .lock()
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .filter(|m| m.sender_id != exclude_sender)
            .filter(|m| match after {
                Some(threshold) => m.created_at > threshold,
                None => true,
            })
            .count();

        Ok(count as i64)
    }
}

#[async_trait]
impl FriendRequestStore for MemoryStore {
    async fn create(&self, request: &FriendRequest) -> Result<FriendRequest> {
        self.lock().friend_requests.push(request.clone());
        Ok(request.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<FriendRequest>> {
        Ok(self
            .lock()
            .friend_requests
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn pending_for(&self, receiver_id: Uuid) -> Result<Vec<FriendRequest>> {
        let mut requests: Vec<FriendRequest> = self
            .lock()
            .friend_requests
            .iter()
            .filter(|r| r.receiver_id == receiver_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn between(&self, a: Uuid, b: Uuid) -> Result<Option<FriendRequest>> {
        Ok(self
            .lock()
            .friend_requests
            .iter()
            .find(|r| {
                (r.sender_id == a && r.receiver_id == b)
                    || (r.sender_id == b && r.receiver_id == a)
            })
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.lock();
        let before = inner.friend_requests.len();
        inner.friend_requests.retain(|r| r.id != id);
        Ok(inner.friend_requests.len() < before)
    }
}
