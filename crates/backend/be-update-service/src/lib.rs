//! Omaha Update Service
//!
//! Answers Omaha 3.0 update checks: decodes the client's `<request>`,
//! decides per app whether the configured release should be offered, and
//! replies with a `<response>` carrying either `noupdate` or a manifest with
//! download locations.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub mod analytics;
pub mod config;
pub mod error;
pub mod handlers;
pub mod service;
pub mod types;
pub mod utils;

use service::AppState;

/// Largest request document accepted
const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Create the axum router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Update engines post to the bare host or to the v1 path
        .route("/", post(handlers::update_check_handler))
        .route("/v1/update/", post(handlers::update_check_handler))
        .route("/health", get(handlers::health_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Initialize the update service from the environment and return the router.
///
/// `analytics` tells whether the global PostHog client is ready.
pub fn init_update_service(analytics: bool) -> Result<Router> {
    let config = ServiceConfig::from_env()
        .context("Failed to load update service config")?
        .with_analytics(analytics);
    debug!(
        "Initializing update service for release {} ({})",
        config.release.version, config.release.channel
    );

    Ok(create_router(Arc::new(AppState::new(config))))
}

pub use config::ServiceConfig;
pub use error::{DecisionError, ErrorResponse, UpdateServiceError};
pub use service::decide;
pub use types::{PackageDescriptor, ReleaseDescriptor, VersionComparison};
