use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::User;

/// Fields a caller wants changed. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub notifications: Option<bool>,
}

/// Body of `PATCH /users/:id`.
///
/// Password changes are not accepted here: the route has no caller identity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub notifications: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: None,
            description: r.description,
            notifications: r.notifications,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Write a posted email directly instead of sending a confirmation.
    pub skip_email_confirmation: bool,
}

/// The record being updated: either a bare identity or a fully loaded user.
#[derive(Debug, Clone)]
pub enum TargetUser {
    Id(Uuid),
    Loaded(User),
}

impl TargetUser {
    pub fn id(&self) -> Uuid {
        match self {
            TargetUser::Id(id) => *id,
            TargetUser::Loaded(user) => user.id,
        }
    }
}

impl From<Uuid> for TargetUser {
    fn from(id: Uuid) -> Self {
        TargetUser::Id(id)
    }
}

impl From<User> for TargetUser {
    fn from(user: User) -> Self {
        TargetUser::Loaded(user)
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub description: String,
    pub notifications: bool,
    pub features: Vec<String>,
    pub tabcoins: i64,
    pub tabcash: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            description: u.description,
            notifications: u.notifications,
            features: u.features,
            tabcoins: u.tabcoins,
            tabcash: u.tabcash,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}
