//! Entity list routes. Handlers resolve the entity type from the path against the registry.

use crate::handlers::entity::{count, list, list_archived};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/:entity_type", get(list))
        .route("/:entity_type/archived", get(list_archived))
        .route("/:entity_type/count", get(count))
        .with_state(state)
}
