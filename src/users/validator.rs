use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::users::{
    dto::UserChanges,
    errors::{UserError, ValidationError},
    repo::UserStore,
};

/// Normalizes and validates posted user fields.
///
/// Returns the mapping that should be persisted, which may differ from the
/// input (trimmed, lowercased). `target_id` is the user being updated, so a
/// uniqueness match on that same user is not a conflict.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, target_id: Uuid, changes: UserChanges)
        -> Result<UserChanges, UserError>;
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9]{3,30}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Format rules plus one uniqueness lookup per posted identity field.
#[derive(Clone)]
pub struct StoreValidator {
    store: Arc<dyn UserStore>,
}

impl StoreValidator {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Validator for StoreValidator {
    async fn validate(
        &self,
        target_id: Uuid,
        mut changes: UserChanges,
    ) -> Result<UserChanges, UserError> {
        if let Some(username) = changes.username.take() {
            let username = username.trim().to_string();
            if !is_valid_username(&username) {
                warn!(%target_id, "invalid username");
                return Err(ValidationError::InvalidUsername.into());
            }
            if let Some(other) = self.store.find_by_username(&username).await? {
                if other.id != target_id {
                    warn!(%target_id, username = %username, "username already taken");
                    return Err(ValidationError::UsernameTaken.into());
                }
            }
            changes.username = Some(username);
        }

        if let Some(email) = changes.email.take() {
            let email = email.trim().to_lowercase();
            if !is_valid_email(&email) {
                warn!(%target_id, "invalid email");
                return Err(ValidationError::InvalidEmail.into());
            }
            if let Some(other) = self.store.find_by_email(&email).await? {
                if other.id != target_id {
                    warn!(%target_id, email = %email, "email already registered");
                    return Err(ValidationError::EmailTaken.into());
                }
            }
            changes.email = Some(email);
        }

        debug!(%target_id, "posted fields validated");
        Ok(changes)
    }
}
