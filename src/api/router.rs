use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::scrape));

    // Protected API routes — require Bearer token when API_TOKEN is set
    let protected = Router::new()
        .route("/api/pronos", post(handlers::pronos::create))
        .route("/api/pronos/today", get(handlers::pronos::today))
        .route("/api/pronos/by-date", get(handlers::pronos::by_date))
        .route("/api/pronos/history", get(handlers::pronos::history))
        .route("/api/pronos/upcoming", get(handlers::pronos::upcoming))
        .route(
            "/api/pronos/update",
            post(handlers::pronos::update).patch(handlers::pronos::update),
        )
        .route(
            "/api/pronos/delete",
            post(handlers::pronos::delete).delete(handlers::pronos::delete),
        )
        .route("/api/pronos/:id", get(handlers::pronos::detail))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
