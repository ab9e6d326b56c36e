use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod query;

pub fn router() -> Router<AppState> {
    handlers::search_routes()
}
