use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    context::RequestContext,
    email_confirmation::{
        mailer::{Mailer, OutgoingEmail},
        repo::TokenStore,
    },
    users::{
        dto::{TargetUser, UpdateOptions, UserChanges},
        errors::UserError,
        repo_types::User,
        services::UserUpdater,
    },
};

/// Starts an email change by sending a confirmation to the new address.
#[async_trait]
pub trait EmailConfirmationIssuer: Send + Sync {
    async fn create_and_send_email(
        &self,
        previous: &User,
        new_email: &str,
        ctx: &RequestContext,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConfirmationError {
    #[error("Invalid or expired confirmation token")]
    InvalidToken,

    #[error(transparent)]
    User(#[from] UserError),
}

impl From<anyhow::Error> for ConfirmationError {
    fn from(e: anyhow::Error) -> Self {
        ConfirmationError::User(UserError::Downstream(e))
    }
}

#[derive(Clone)]
pub struct EmailConfirmationService {
    tokens: Arc<dyn TokenStore>,
    mailer: Arc<dyn Mailer>,
    public_url: String,
    from: String,
    ttl: Duration,
}

impl EmailConfirmationService {
    pub fn new(config: &AppConfig, tokens: Arc<dyn TokenStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            tokens,
            mailer,
            public_url: config.public_url.clone(),
            from: config.email.from.clone(),
            ttl: Duration::minutes(config.email.confirmation_ttl_minutes),
        }
    }

    pub fn confirmation_url(&self, token_id: Uuid) -> String {
        format!("{}/confirm-email/{}", self.public_url, token_id)
    }

    /// Applies the pending email of `token_id` to its user.
    #[instrument(skip(self, users, ctx), fields(request_id = %ctx.request_id))]
    pub async fn confirm_email_update(
        &self,
        users: &UserUpdater,
        token_id: Uuid,
        ctx: &RequestContext,
    ) -> Result<User, ConfirmationError> {
        let token = self
            .tokens
            .find_valid(token_id)
            .await?
            .filter(|t| t.is_usable(OffsetDateTime::now_utc()))
            .ok_or_else(|| {
                warn!(%token_id, "invalid or expired email confirmation token");
                ConfirmationError::InvalidToken
            })?;

        let changes = UserChanges {
            email: Some(token.email.clone()),
            ..Default::default()
        };
        let options = UpdateOptions {
            skip_email_confirmation: true,
        };
        let user = users
            .update(TargetUser::Id(token.user_id), changes, options, ctx)
            .await?;

        self.tokens.mark_used(token.id).await?;
        info!(user_id = %user.id, %token_id, "email change confirmed");
        Ok(user)
    }
}

#[async_trait]
impl EmailConfirmationIssuer for EmailConfirmationService {
    #[instrument(skip(self, previous, new_email, ctx), fields(user_id = %previous.id, request_id = %ctx.request_id))]
    async fn create_and_send_email(
        &self,
        previous: &User,
        new_email: &str,
        ctx: &RequestContext,
    ) -> anyhow::Result<()> {
        let expires_at = OffsetDateTime::now_utc() + self.ttl;
        let token = self
            .tokens
            .create(previous.id, new_email, expires_at)
            .await?;

        let email = OutgoingEmail {
            from: self.from.clone(),
            to: new_email.to_string(),
            subject: "Confirme seu novo email".into(),
            text: format!(
                "{}, uma alteração de email foi solicitada para a sua conta.\n\n\
                 Clique no link abaixo para confirmar o novo endereço:\n\n{}\n\n\
                 Se você não fez esta solicitação, ignore este email. \
                 O email atual ({}) continua ativo até a confirmação.",
                previous.username,
                self.confirmation_url(token.id),
                previous.email,
            ),
        };
        self.mailer
            .send(&email)
            .await
            .with_context(|| format!("send confirmation email for token {}", token.id))?;

        info!(token_id = %token.id, "email confirmation issued");
        Ok(())
    }
}
