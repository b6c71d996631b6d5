//! User directory repository

use async_trait::async_trait;
use relay_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::User;
use crate::UserDirectory;

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, username, email, image_url, status,
                   created_at, updated_at
            FROM users
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, username, email, image_url, status,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, username, email, image_url, status,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upsert(&self, user: &User) -> Result<User> {
        let stored = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, subject, username, email, image_url, status,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (subject) DO UPDATE SET
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                image_url = EXCLUDED.image_url,
                updated_at = NOW()
            RETURNING id, subject, username, email, image_url, status,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.subject)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.image_url)
        .bind(&user.status)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                status = NULLIF($2, ''),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, subject, username, email, image_url, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
