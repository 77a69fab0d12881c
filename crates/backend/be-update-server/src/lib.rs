use std::net::SocketAddr;

use anyhow::{Context, Result};
use be_update_service::init_update_service;

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";

/// Configuration for running the update server.
pub struct ServerConfig {
    pub http_addr: SocketAddr,
    /// When this receiver gets a value, the server shuts down gracefully.
    pub shutdown: tokio::sync::watch::Receiver<()>,
}

impl ServerConfig {
    pub fn from_env(shutdown: tokio::sync::watch::Receiver<()>) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), shutdown)
    }

    pub fn from_lookup<F>(lookup: F, shutdown: tokio::sync::watch::Receiver<()>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("HTTP_ADDR")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid HTTP_ADDR format: {raw_addr}"))?;

        Ok(Self {
            http_addr,
            shutdown,
        })
    }
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let analytics = init_analytics(std::env::var("POSTHOG_API_KEY").ok()).await;

    let router = init_update_service(analytics).inspect_err(|e| {
        tracing::error!("Failed to initialize update service: {:#}", e);
    })?;

    tracing::info!("Starting HTTP server at {}", config.http_addr);

    let mut shutdown = config.shutdown.clone();
    let listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.http_addr))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
            tracing::info!("Shutting down HTTP server...");
        })
        .await
        .inspect_err(|e| tracing::error!("HTTP server error: {}", e))?;

    Ok(())
}

/// Initialises the global PostHog client and reports whether capture is
/// available.
async fn init_analytics(api_key: Option<String>) -> bool {
    let Some(posthog_key) = api_key.filter(|s| !s.is_empty()) else {
        tracing::info!("POSTHOG_API_KEY not set, analytics disabled");
        return false;
    };

    match posthog_rs::init_global(posthog_key.as_str()).await {
        Ok(()) => {
            tracing::info!("PostHog analytics initialized");
            true
        }
        Err(e) => {
            tracing::warn!("Failed to initialize PostHog, analytics disabled: {}", e);
            false
        }
    }
}
