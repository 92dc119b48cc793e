pub mod health;
pub mod pages;

use axum::Router;

use crate::middleware::body_limit;
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(pages::routes())
        .layer(body_limit::extractor_limit_layer())
        .layer(body_limit::body_limit_layer())
        .with_state(state)
}
