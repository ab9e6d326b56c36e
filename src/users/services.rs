use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    context::RequestContext,
    email_confirmation::services::EmailConfirmationIssuer,
    users::{
        dto::{TargetUser, UpdateOptions, UserChanges},
        errors::UserError,
        password::hash_posted_password,
        repo::UserStore,
        repo_types::{User, UserUpdate},
        validator::Validator,
    },
};

/// Which sequence of collaborator calls an update needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// No username or email posted: no refetch, no validation.
    NonIdentityOnly,
    UsernameOnly,
    /// Email posted and must be confirmed: refetch first, write the email
    /// only once the confirmation is accepted.
    EmailWithConfirmation,
    EmailSkipConfirmation,
}

impl UpdateKind {
    pub fn classify(changes: &UserChanges, options: UpdateOptions) -> Self {
        match (changes.email.is_some(), changes.username.is_some()) {
            (true, _) if options.skip_email_confirmation => UpdateKind::EmailSkipConfirmation,
            (true, _) => UpdateKind::EmailWithConfirmation,
            (false, true) => UpdateKind::UsernameOnly,
            (false, false) => UpdateKind::NonIdentityOnly,
        }
    }

    fn needs_refetch(self) -> bool {
        self == UpdateKind::EmailWithConfirmation
    }

    fn needs_validation(self) -> bool {
        self != UpdateKind::NonIdentityOnly
    }
}

/// Applies posted changes to a user record.
#[derive(Clone)]
pub struct UserUpdater {
    store: Arc<dyn UserStore>,
    validator: Arc<dyn Validator>,
    email_confirmation: Arc<dyn EmailConfirmationIssuer>,
}

impl UserUpdater {
    pub fn new(
        store: Arc<dyn UserStore>,
        validator: Arc<dyn Validator>,
        email_confirmation: Arc<dyn EmailConfirmationIssuer>,
    ) -> Self {
        Self {
            store,
            validator,
            email_confirmation,
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip_all, fields(user_id = %target.id(), request_id = %ctx.request_id))]
    pub async fn update(
        &self,
        target: TargetUser,
        posted: UserChanges,
        options: UpdateOptions,
        ctx: &RequestContext,
    ) -> Result<User, UserError> {
        let id = target.id();
        let kind = UpdateKind::classify(&posted, options);
        debug!(?kind, "user update classified");

        let previous = if kind.needs_refetch() {
            Some(self.find_by_id(id).await?)
        } else {
            None
        };

        let mut changes = if kind.needs_validation() {
            self.validator.validate(id, posted).await?
        } else {
            posted
        };

        // a posted address equal to the current one needs no confirmation
        let pending_email = match (&previous, kind) {
            (Some(previous), UpdateKind::EmailWithConfirmation) => changes
                .email
                .take()
                .filter(|email| !email.eq_ignore_ascii_case(&previous.email)),
            _ => None,
        };

        let update = UserUpdate {
            username: changes.username,
            email: changes.email,
            password_hash: changes
                .password
                .as_deref()
                .map(hash_posted_password)
                .transpose()?,
            description: changes.description,
            notifications: changes.notifications,
        };

        let updated = self
            .store
            .update(id, &update)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let (Some(previous), Some(new_email)) = (previous, pending_email) {
            self.email_confirmation
                .create_and_send_email(&previous, &new_email, ctx)
                .await?;
        }

        info!(?kind, "user updated");
        Ok(updated)
    }
}
