//! Conversation repository

use async_trait::async_trait;
use relay_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{Conversation, ConversationMember};
use crate::ConversationStore;

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn find(&self, id: Uuid) -> Result<Option<Conversation>> {
        let conv = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, is_group, name, last_message_id, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(conv)
    }

    async fn create(
        &self,
        conversation: &Conversation,
        member_ids: &[Uuid],
    ) -> Result<Conversation> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (id, is_group, name, last_message_id,
                                       created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, is_group, name, last_message_id, created_at, updated_at
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.is_group)
        .bind(&conversation.name)
        .bind(conversation.last_message_id)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        for member_id in member_ids {
            let member = ConversationMember::new(created.id, *member_id);
            sqlx::query(
                r#"
                INSERT INTO conversation_members
                    (id, conversation_id, member_id, last_seen_message_id, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(member.id)
            .bind(member.conversation_id)
            .bind(member.member_id)
            .bind(member.last_seen_message_id)
            .bind(member.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn members_of(&self, conversation_id: Uuid) -> Result<Vec<ConversationMember>> {
        let members = sqlx::query_as::<_, ConversationMember>(
            r#"
            SELECT id, conversation_id, member_id, last_seen_message_id, created_at
            FROM conversation_members
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn memberships_for(&self, member_id: Uuid) -> Result<Vec<ConversationMember>> {
        let memberships = sqlx::query_as::<_, ConversationMember>(
            r#"
            SELECT id, conversation_id, member_id, last_seen_message_id, created_at
            FROM conversation_members
            WHERE member_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }

    async fn set_last_message(
        &self,
        conversation_id: Uuid,
        message_id: Option<Uuid>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE conversations SET
                last_message_id = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(conversation_id)
        .bind(message_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(())
    }

    async fn mark_read(
        &self,
        conversation_id: Uuid,
        member_id: Uuid,
        message_id: Uuid,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE conversation_members SET
                last_seen_message_id = $3
            WHERE conversation_id = $1 AND member_id = $2
            "#,
        )
        .bind(conversation_id)
        .bind(member_id)
        .bind(message_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound.into());
        }
        Ok(())
    }
}
