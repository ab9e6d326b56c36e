use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;
use crate::email_confirmation::{
    mailer::{Mailer, TracingMailer},
    repo::{PgTokenStore, TokenStore},
    services::{EmailConfirmationIssuer, EmailConfirmationService},
};
use crate::users::{
    repo::{PgUserStore, UserStore},
    services::UserUpdater,
    validator::StoreValidator,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub users: UserUpdater,
    pub email_confirmation: Arc<EmailConfirmationService>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let store = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let tokens = Arc::new(PgTokenStore::new(db.clone())) as Arc<dyn TokenStore>;
        let mailer = Arc::new(TracingMailer) as Arc<dyn Mailer>;

        Ok(Self::from_parts(db, config, store, tokens, mailer))
    }

    pub fn from_parts(
        db: PgPool,
        config: &AppConfig,
        store: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let email_confirmation = Arc::new(EmailConfirmationService::new(config, tokens, mailer));
        let users = UserUpdater::new(
            store.clone(),
            Arc::new(StoreValidator::new(store)),
            email_confirmation.clone() as Arc<dyn EmailConfirmationIssuer>,
        );

        Self {
            db,
            users,
            email_confirmation,
        }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<dyn UserStore>, tokens: Arc<dyn TokenStore>) -> Self {
        let config = crate::testing::test_config();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool ok");

        Self::from_parts(
            db,
            &config,
            store,
            tokens,
            Arc::new(crate::testing::RecordingMailer::default()),
        )
    }
}
