use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod mailer;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::email_confirmation_routes()
}
