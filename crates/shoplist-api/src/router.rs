use axum::{Router, routing::get};

use crate::entries;
use crate::gate::AppState;

/// All routes of the list service. `/entry` and `/list` go through the
/// authorization gate inside each handler; `/health` carries no data.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/entry",
            get(entries::read_entry)
                .post(entries::create_entry)
                .delete(entries::delete_entry)
                .fallback(entries::unsupported_method),
        )
        .route(
            "/list",
            get(entries::list_entries).fallback(entries::unsupported_method),
        )
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
