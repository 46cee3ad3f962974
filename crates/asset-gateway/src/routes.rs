//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, head, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", head(handlers::health_check))
        .route("/api/digitalAssets", post(handlers::upload_assets))
        .route("/api/digitalAssets/server/{id}", get(handlers::serve_asset))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Uploads may be arbitrarily large; the pipeline streams them,
        // so no request size limit is imposed here.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
