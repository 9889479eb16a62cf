//! Router construction for the directory server.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::services::DirectoryService;

/// Build the full axum router with all routes and middleware.
pub fn build_router(service: Arc<DirectoryService>) -> Router {
    Router::new()
        .route("/building", post(handlers::add_building))
        .route("/building/", post(handlers::add_building))
        .route(
            "/building/:id",
            get(handlers::get_companies_from_building),
        )
        .route("/rubric/:id", get(handlers::get_companies_from_rubric))
        .route("/company/:id", get(handlers::get_company))
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .layer(Extension(service))
}
