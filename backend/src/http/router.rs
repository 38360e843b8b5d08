//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; restrict origins when deployed behind a known frontend.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/activities", get(handlers::list_activities))
        .route("/activities/statistics", get(handlers::get_statistics))
        .route(
            "/activities/{name}/history",
            get(handlers::get_activity_history),
        )
        .route("/activities/{name}/signup", post(handlers::sign_up))
        .route("/activities/{name}/unregister", delete(handlers::unregister))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RepositoryFactory;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(RepositoryFactory::create_local());
        let _router = create_router(state);
    }
}
