//! Checkmark API Server with graceful shutdown

use axum::{middleware, Router};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::signal;

use crate::error::ApiError;
use crate::middleware::{
    body_limit_layer, cors_layer, request_id_middleware, tracing_middleware, with_timeout,
};
use crate::profile::Deployment;
use crate::routes::api_router;
use crate::state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Route set served by this instance
    pub deployment: Deployment,
    /// Server address
    pub addr: SocketAddr,
    /// Request timeout
    pub timeout: Duration,
    /// Max request body size (bytes)
    pub max_body_size: usize,
    /// Comma-separated CORS allow list; `None` allows any origin
    pub cors_origins: Option<String>,
}

impl ServerConfig {
    /// Defaults for a deployment: all interfaces, its conventional port
    pub fn new(deployment: Deployment) -> Self {
        Self {
            deployment,
            addr: SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                deployment.default_port(),
            ),
            timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024, // 1MB
            cors_origins: None,
        }
    }

    /// Create from environment variables
    pub fn from_env(deployment: Deployment) -> Self {
        let defaults = Self::new(deployment);

        let host: IpAddr = std::env::var("CHECKMARK_HOST")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or(defaults.addr.ip());

        let port: u16 = std::env::var(deployment.port_env())
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.addr.port());

        let timeout_secs: u64 = std::env::var("CHECKMARK_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.timeout.as_secs());

        let max_body_size: usize = std::env::var("CHECKMARK_MAX_BODY_BYTES")
            .ok()
            .and_then(|b| b.parse().ok())
            .unwrap_or(defaults.max_body_size);

        Self {
            addr: SocketAddr::new(host, port),
            timeout: Duration::from_secs(timeout_secs),
            max_body_size,
            cors_origins: std::env::var("CHECKMARK_CORS_ORIGINS").ok(),
            ..defaults
        }
    }
}

/// One deployment bound to one listener
pub struct CheckmarkServer {
    config: ServerConfig,
    routes: Router,
}

impl CheckmarkServer {
    /// Create a server with a fresh store for the configured deployment
    pub fn new(config: ServerConfig) -> Self {
        let routes = match config.deployment {
            Deployment::Items => api_router(AppState::items()),
            Deployment::Todos => api_router(AppState::todos()),
        };
        Self { config, routes }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the configured router with the middleware stack applied
    pub fn router(&self) -> Router {
        // Body size limit (innermost)
        let routes = self
            .routes
            .clone()
            .layer(body_limit_layer(self.config.max_body_size));

        // Layers run bottom to top: the request id is assigned first
        with_timeout(routes, self.config.timeout)
            // CORS
            .layer(cors_layer(self.config.cors_origins.as_deref()))
            // Tracing
            .layer(middleware::from_fn(tracing_middleware))
            // Request ID (outermost)
            .layer(middleware::from_fn(request_id_middleware))
    }

    /// Run the server with graceful shutdown
    pub async fn run(self) -> Result<(), ApiError> {
        let app = self.router();
        let addr = self.config.addr;
        let deployment = self.config.deployment;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%deployment, "Checkmark API listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

        tracing::info!(%deployment, "Server shutdown complete");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Initialize tracing subscriber
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,checkmark_api=debug,checkmark_store=debug,tower_http=debug")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
