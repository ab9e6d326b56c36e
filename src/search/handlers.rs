use axum::{extract::RawQuery, routing::get, Json, Router};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{search::query::SearchQuery, state::AppState};

#[derive(Debug, Serialize)]
pub struct OverlayState {
    pub open: bool,
    pub term: Option<String>,
}

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search/overlay", get(overlay_state))
}

/// GET /search/overlay?q=...
#[instrument]
pub async fn overlay_state(RawQuery(query): RawQuery) -> Json<OverlayState> {
    let parsed = SearchQuery::from_search(query.as_deref().unwrap_or_default());
    debug!(open = parsed.overlay_initially_open(), "search overlay state");
    Json(OverlayState {
        open: parsed.overlay_initially_open(),
        term: parsed.term().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_with_term() {
        let Json(state) = overlay_state(RawQuery(Some("q=teste+tdd".into()))).await;
        assert!(state.open);
        assert_eq!(state.term.as_deref(), Some("teste tdd"));
    }

    #[tokio::test]
    async fn closed_without_query() {
        let Json(state) = overlay_state(RawQuery(None)).await;
        assert!(!state.open);
        assert!(state.term.is_none());

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"open":false,"term":null}"#);
    }
}
