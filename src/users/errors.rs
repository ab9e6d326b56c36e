use axum::http::StatusCode;
use uuid::Uuid;

/// Validation errors for posted user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid username: must be 3-30 characters, letters and digits only")]
    InvalidUsername,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Password too short: minimum 8 characters required")]
    PasswordTooShort,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store, hashing or email transport failure, passed through as-is.
    #[error(transparent)]
    Downstream(#[from] anyhow::Error),
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::NotFound(_) => StatusCode::NOT_FOUND,
            UserError::Validation(ValidationError::UsernameTaken)
            | UserError::Validation(ValidationError::EmailTaken) => StatusCode::CONFLICT,
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
