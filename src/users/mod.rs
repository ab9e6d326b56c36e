use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod errors;
pub mod handlers;
pub(crate) mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validator;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
