use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    context::RequestContext,
    email_confirmation::services::ConfirmationError,
    state::AppState,
    users::{dto::PublicUser, handlers::reject},
};

#[derive(Debug, Deserialize)]
pub struct ConfirmEmailRequest {
    pub token_id: Uuid,
}

pub fn email_confirmation_routes() -> Router<AppState> {
    Router::new().route("/email-confirmation", post(confirm_email))
}

#[instrument(skip(state, ctx), fields(request_id = %ctx.request_id))]
pub async fn confirm_email(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<ConfirmEmailRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state
        .email_confirmation
        .confirm_email_update(&state.users, payload.token_id, &ctx)
        .await
        .map_err(|e| match e {
            ConfirmationError::InvalidToken => (StatusCode::BAD_REQUEST, e.to_string()),
            ConfirmationError::User(e) => reject(e),
        })?;

    info!(user_id = %user.id, "email confirmed");
    Ok(Json(user.into()))
}
