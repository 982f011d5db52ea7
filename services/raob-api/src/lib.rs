//! RAOB Tool Service Library
//!
//! This crate provides the sounding tools (station lookup, convective
//! indices, Skew-T and hodograph plots) and the HTTP server that exposes them.

pub mod config;
pub mod handlers;
pub mod state;
pub mod tools;
pub mod upstream;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Tools
        .route("/tools", get(handlers::tools::list_tools_handler))
        .route(
            "/tools/find_station",
            post(handlers::tools::find_station_handler),
        )
        .route(
            "/tools/get_indices",
            post(handlers::tools::get_indices_handler),
        )
        .route(
            "/tools/generate_skewt",
            post(handlers::tools::generate_skewt_handler),
        )
        .route(
            "/tools/generate_hodograph",
            post(handlers::tools::generate_hodograph_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
