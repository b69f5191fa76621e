//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Resolve the HSTS policy from configuration
//! - Create Axum Router with the catch-all handler
//! - Wire up middleware (tracing, timeout, HSTS)
//! - Serve on a listener until shutdown

use std::future::Future;
use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, routing::any, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{warn_preload_requirements, AppConfig};
use crate::security::{HstsError, HstsLayer, HstsPolicy};

/// HTTP server answering every request with the HSTS header attached.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    policy: HstsPolicy,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Expects logging to be initialized; preload-list warnings are reported here.
    pub fn new(config: AppConfig) -> Result<Self, HstsError> {
        let policy = HstsPolicy::configure(&config.hsts)?;
        warn_preload_requirements(&config.hsts);
        let router = Self::build_router(&config, &policy);
        Ok(Self {
            router,
            config,
            policy,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, policy: &HstsPolicy) -> Router {
        Router::new()
            .route("/{*path}", any(ok_handler))
            .route("/", any(ok_handler))
            .layer(HstsLayer::new(policy.clone()))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_with_shutdown(listener, shutdown_signal()).await
    }

    /// Run the server until `signal` resolves.
    pub async fn run_with_shutdown<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_age = self.policy.max_age(),
            expires = ?self.policy.expires(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router with every middleware layer applied.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the resolved HSTS policy.
    pub fn policy(&self) -> &HstsPolicy {
        &self.policy
    }
}

async fn ok_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
