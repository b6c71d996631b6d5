//! Friend request repository

use async_trait::async_trait;
use relay_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FriendRequest;
use crate::FriendRequestStore;

#[derive(Clone)]
pub struct PgFriendRequestStore {
    pool: PgPool,
}

impl PgFriendRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendRequestStore for PgFriendRequestStore {
    async fn create(&self, request: &FriendRequest) -> Result<FriendRequest> {
        let created = sqlx::query_as::<_, FriendRequest>(
            r#"
            INSERT INTO friend_requests (id, sender_id, receiver_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_id, receiver_id, created_at
            "#,
        )
        .bind(request.id)
        .bind(request.sender_id)
        .bind(request.receiver_id)
        .bind(request.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<FriendRequest>> {
        let request = sqlx::query_as::<_, FriendRequest>(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM friend_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn pending_for(&self, receiver_id: Uuid) -> Result<Vec<FriendRequest>> {
        let requests = sqlx::query_as::<_, FriendRequest>(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM friend_requests
            WHERE receiver_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(receiver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn between(&self, a: Uuid, b: Uuid) -> Result<Option<FriendRequest>> {
        let request = sqlx::query_as::<_, FriendRequest>(
            r#"
            SELECT id, sender_id, receiver_id, created_at
            FROM friend_requests
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            LIMIT 1
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM friend_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
