//! API server entry point.
//!
//! [`ApiServer::start`] builds the handler state from the configured
//! diagnostics settings, binds the listener, spawns the axum server as a
//! tokio task and returns the bound address together with the
//! `JoinHandle`.
//!
//! # Graceful shutdown
//!
//! The server accepts a `tokio::sync::watch::Receiver<bool>`. When the
//! watch value becomes `true` (or the sender is dropped) the server
//! stops accepting connections and drains in-flight requests.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use hoprd_types::{HoprdError, Result};

use crate::config::ApiConfig;
use crate::handlers::{build_router, AppState, NodeServices};

/// Returns a future that resolves when the shutdown watch fires.
async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            break;
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
}

/// Manages the lifecycle of the HTTP server.
pub struct ApiServer;

impl ApiServer {
    /// Validates `config`, builds the state from `config.diagnostics`
    /// and `services`, binds and starts serving.
    ///
    /// # Errors
    ///
    /// Returns `HoprdError::ConfigError` if validation fails,
    /// `HoprdError::InvalidAlias` for an unusable stored alias, or
    /// `HoprdError::NetworkError` if the listener cannot bind.
    pub async fn start(
        config: ApiConfig,
        services: NodeServices,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(SocketAddr, JoinHandle<()>)> {
        config.validate()?;
        let state = Arc::new(AppState::from_config(
            &config.diagnostics,
            services.aggregator,
            services.aliases,
            services.pinger,
        )?);

        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|e| HoprdError::NetworkError {
                reason: format!("failed to bind {}: {e}", config.bind_addr),
            })?;
        let local_addr = listener.local_addr().map_err(|e| HoprdError::NetworkError {
            reason: format!("failed to read bound address: {e}"),
        })?;

        let router = build_router(state, config.api_token.as_deref());

        tracing::info!(
            addr = %local_addr,
            auth = config.api_token.is_some(),
            ping_timeout_ms = config.diagnostics.ping_timeout_ms,
            "API server listening"
        );

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
                .await;
            match result {
                Ok(()) => tracing::info!("API server stopped"),
                Err(e) => tracing::error!(error = %e, "API server failed"),
            }
        });

        Ok((local_addr, handle))
    }
}
