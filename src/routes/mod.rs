//! Routers: common (health, readiness, version) and entity listing.

pub mod common;
pub mod entity;
pub use common::*;
pub use entity::*;

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Full application: common routes at the root, entity listing under `prefix` (e.g. `/api/v1`).
/// An empty or `/` prefix mounts entity routes at the root.
pub fn app(state: AppState, prefix: &str) -> Router {
    let common = common_routes_with_ready(state.clone());
    let router = match prefix.trim_end_matches('/') {
        "" => common.merge(entity_routes(state)),
        p => common.nest(p, entity_routes(state)),
    };
    router.layer(TraceLayer::new_for_http())
}
