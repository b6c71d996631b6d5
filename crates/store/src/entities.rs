//! Store entities
//!
//! Records as they live in the document store. Constructors validate the
//! invariants the store itself cannot express.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use relay_common::{Error, Result};

/// Maximum username length (varchar(64))
const MAX_USERNAME_LENGTH: usize = 64;

/// Maximum status text length (CHECK length <= 128)
const MAX_STATUS_LENGTH: usize = 128;

/// Maximum group name length (varchar(100))
const MAX_GROUP_NAME_LENGTH: usize = 100;

/// A local user record, mirrored from the external identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    /// Opaque subject identifier assigned by the identity provider.
    pub subject: String,
    pub username: String,
    pub email: String,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record from identity-provider data
    pub fn new(
        subject: String,
        username: String,
        email: String,
        image_url: Option<String>,
    ) -> Result<Self> {
        if subject.is_empty() {
            return Err(Error::Validation("Subject is required".to_string()));
        }
        if username.trim().is_empty() {
            return Err(Error::Validation("Username is required".to_string()));
        }
        if username.len() > MAX_USERNAME_LENGTH {
            return Err(Error::Validation(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        if email.is_empty() {
            return Err(Error::Validation("Email is required".to_string()));
        }

        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4(),
            subject,
            username,
            email,
            image_url,
            status: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate a status text before writing it
    pub fn validate_status(status: &str) -> Result<()> {
        if status.trim().is_empty() {
            return Err(Error::Validation("Status cannot be empty".to_string()));
        }
        if status.len() > MAX_STATUS_LENGTH {
            return Err(Error::Validation(format!(
                "Status must be at most {} characters",
                MAX_STATUS_LENGTH
            )));
        }
        Ok(())
    }
}

/// A conversation: either 1:1 (two members) or a named group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub is_group: bool,
    /// Group conversations carry a name; 1:1 conversations never do.
    pub name: Option<String>,
    /// Reference to the most recent message, updated on every send.
    pub last_message_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a 1:1 conversation
    pub fn direct() -> Self {
        let now = Utc::now();
        Conversation {
            id: Uuid::new_v4(),
            is_group: false,
            name: None,
            last_message_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a group conversation
    pub fn group(name: String) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::Validation("Group name is required".to_string()));
        }
        if name.len() > MAX_GROUP_NAME_LENGTH {
            return Err(Error::Validation(format!(
                "Group name must be at most {} characters",
                MAX_GROUP_NAME_LENGTH
            )));
        }

        let now = Utc::now();
        Ok(Conversation {
            id: Uuid::new_v4(),
            is_group: true,
            name: Some(name),
            last_message_id: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Membership row linking a user to a conversation.
///
/// Carries the member's last-seen marker: a reference to the most recent
/// message the member has viewed. At most one row exists per
/// (member_id, conversation_id) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationMember {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub member_id: Uuid,
    pub last_seen_message_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ConversationMember {
    pub fn new(conversation_id: Uuid, member_id: Uuid) -> Self {
        ConversationMember {
            id: Uuid::new_v4(),
            conversation_id,
            member_id,
            last_seen_message_id: None,
            created_at: Utc::now(),
        }
    }
}

/// Message kind.
///
/// The wire value is an open string: the four known kinds render specific
/// preview labels, anything else degrades to a generic label rather than
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
    Pdf,
    Other(String),
}

impl MessageKind {
    /// Display text for a conversation-list preview
    pub fn preview_label(&self, content: &str) -> String {
        match self {
            MessageKind::Text => content.to_string(),
            MessageKind::Image => "📷 Image".to_string(),
            MessageKind::Audio => "🔊 Audio".to_string(),
            MessageKind::Pdf => "📎 Attachment".to_string(),
            MessageKind::Other(_) => "Unsupported message type".to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Audio => "audio",
            MessageKind::Pdf => "pdf",
            MessageKind::Other(s) => s,
        }
    }
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => MessageKind::Text,
            "image" => MessageKind::Image,
            "audio" => MessageKind::Audio,
            "pdf" => MessageKind::Pdf,
            _ => MessageKind::Other(s),
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub kind: MessageKind,
    /// Raw text for `text` messages; an asset URL for attachment kinds.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message (CHECK (length(trim(content)) > 0))
    pub fn new(
        conversation_id: Uuid,
        sender_id: Uuid,
        kind: MessageKind,
        content: String,
    ) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }

        Ok(Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            kind,
            content,
            created_at: Utc::now(),
        })
    }
}

/// A pending friend request. Accepting deletes the row and creates the 1:1
/// conversation; declining just deletes the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FriendRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl FriendRequest {
    pub fn new(sender_id: Uuid, receiver_id: Uuid) -> Result<Self> {
        if sender_id == receiver_id {
            return Err(Error::Validation(
                "Cannot send a friend request to yourself".to_string(),
            ));
        }

        Ok(FriendRequest {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            created_at: Utc::now(),
        })
    }
}
