use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::email_confirmation::repo_types::EmailConfirmationToken;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Creates a token for `user_id`, retiring the user's earlier unused tokens.
    async fn create(
        &self,
        user_id: Uuid,
        email: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<EmailConfirmationToken>;

    /// Returns the token only if it is unused and not expired.
    async fn find_valid(&self, id: Uuid) -> anyhow::Result<Option<EmailConfirmationToken>>;

    async fn mark_used(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgTokenStore {
    db: PgPool,
}

impl PgTokenStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn create(
        &self,
        user_id: Uuid,
        email: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<EmailConfirmationToken> {
        let token = sqlx::query_as::<_, EmailConfirmationToken>(
            r#"
            WITH superseded AS (
                UPDATE email_confirmation_tokens
                   SET used = true, updated_at = now()
                 WHERE user_id = $1
                   AND used = false
            )
            INSERT INTO email_confirmation_tokens (user_id, email, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, email, used, expires_at, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(expires_at)
        .fetch_one(&self.db)
        .await
        .context("insert email confirmation token")?;
        Ok(token)
    }

    async fn find_valid(&self, id: Uuid) -> anyhow::Result<Option<EmailConfirmationToken>> {
        let token = sqlx::query_as::<_, EmailConfirmationToken>(
            r#"
            SELECT id, user_id, email, used, expires_at, created_at, updated_at
              FROM email_confirmation_tokens
             WHERE id = $1
               AND used = false
               AND expires_at > now()
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find email confirmation token")?;
        Ok(token)
    }

    async fn mark_used(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE email_confirmation_tokens
               SET used = true, updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await
        .context("mark email confirmation token used")?;
        Ok(())
    }
}
