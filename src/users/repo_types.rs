use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Raw row as returned by the user queries.
///
/// Balances are aggregated from `balance_operations` and come back NULL for
/// users without any operation.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub description: String,
    pub notifications: bool,
    pub features: Vec<String>,
    pub tabcoins: Option<i64>,
    pub tabcash: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Full user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // argon2 hash, not exposed in JSON
    pub description: String,
    pub notifications: bool,
    pub features: Vec<String>,
    pub tabcoins: i64,
    pub tabcash: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            email: r.email,
            password: r.password,
            description: r.description,
            notifications: r.notifications,
            features: r.features,
            tabcoins: r.tabcoins.unwrap_or(0),
            tabcash: r.tabcash.unwrap_or(0),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Column values written by the single update statement. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub description: Option<String>,
    pub notifications: Option<bool>,
}
