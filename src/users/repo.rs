use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::repo_types::{User, UserRow, UserUpdate};

/// Persisted user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    /// Case-insensitive lookup.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Runs the single update statement for `id`. `None` means no row matched.
    async fn update(&self, id: Uuid, changes: &UserUpdate) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_one(&self, sql: &str, value: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                u.id, u.username, u.email, u.password, u.description, u.notifications,
                u.features, u.created_at, u.updated_at,
                (SELECT SUM(amount) FROM balance_operations
                  WHERE recipient_id = u.id AND balance_type = 'user:tabcoin') AS tabcoins,
                (SELECT SUM(amount) FROM balance_operations
                  WHERE recipient_id = u.id AND balance_type = 'user:tabcash') AS tabcash
            FROM users u
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        self.find_one(
            r#"
            SELECT
                u.id, u.username, u.email, u.password, u.description, u.notifications,
                u.features, u.created_at, u.updated_at,
                NULL::bigint AS tabcoins,
                NULL::bigint AS tabcash
            FROM users u
            WHERE LOWER(u.username) = LOWER($1)
            "#,
            username,
        )
        .await
        .context("find user by username")
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.find_one(
            r#"
            SELECT
                u.id, u.username, u.email, u.password, u.description, u.notifications,
                u.features, u.created_at, u.updated_at,
                NULL::bigint AS tabcoins,
                NULL::bigint AS tabcash
            FROM users u
            WHERE LOWER(u.email) = LOWER($1)
            "#,
            email,
        )
        .await
        .context("find user by email")
    }

    async fn update(&self, id: Uuid, changes: &UserUpdate) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            WITH updated_user AS (
                UPDATE users SET
                    username = COALESCE($2, username),
                    email = COALESCE($3, email),
                    password = COALESCE($4, password),
                    description = COALESCE($5, description),
                    notifications = COALESCE($6, notifications),
                    updated_at = now()
                WHERE
                    id = $1
                RETURNING *
            )
            SELECT
                u.id, u.username, u.email, u.password, u.description, u.notifications,
                u.features, u.created_at, u.updated_at,
                (SELECT SUM(amount) FROM balance_operations
                  WHERE recipient_id = u.id AND balance_type = 'user:tabcoin') AS tabcoins,
                (SELECT SUM(amount) FROM balance_operations
                  WHERE recipient_id = u.id AND balance_type = 'user:tabcash') AS tabcash
            FROM updated_user u
            "#,
        )
        .bind(id)
        .bind(changes.username.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.notifications)
        .fetch_optional(&self.db)
        .await
        .context("update user")?;
        Ok(row.map(User::from))
    }
}
