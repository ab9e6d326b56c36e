use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    context::RequestContext,
    state::AppState,
    users::{
        dto::{PublicUser, TargetUser, UpdateOptions, UpdateUserRequest},
        errors::UserError,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:id", get(get_user).patch(update_user))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state.users.find_by_id(id).await.map_err(reject)?;
    Ok(Json(user.into()))
}

/// PATCH /users/:id
/// Email changes are held until the address is confirmed.
#[instrument(skip(state, ctx, payload), fields(request_id = %ctx.request_id))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = state
        .users
        .update(TargetUser::Id(id), payload.into(), UpdateOptions::default(), &ctx)
        .await
        .map_err(reject)?;

    info!(user_id = %user.id, "user patched");
    Ok(Json(user.into()))
}

pub(crate) fn reject(e: UserError) -> (StatusCode, String) {
    let status = e.status();
    if status.is_server_error() {
        error!(error = %e, "user request failed");
    } else {
        warn!(error = %e, %status, "user request rejected");
    }
    (status, e.to_string())
}
