use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Pending email change. The token id is what gets sent to the user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct EmailConfirmationToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub used: bool,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl EmailConfirmationToken {
    pub fn is_usable(&self, now: OffsetDateTime) -> bool {
        !self.used && self.expires_at > now
    }
}
