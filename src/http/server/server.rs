//! HTTP server implementation.
//

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use crate::config::{Config, ConfigTrait};
use crate::controller::controller::Controller;
use crate::middleware::middleware::Middleware;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Server trait for HTTP server operations.
#[async_trait::async_trait]
pub trait Server: Send + Sync {
    /// Starts the server (blocking).
    async fn listen_and_serve(&self) -> Result<()>;
}

/// HTTP server implementation.
pub struct HttpServer {
    shutdown_token: CancellationToken,
    config: Config,
    router: Router,
}

impl HttpServer {
    /// Creates a new HTTP server.
    pub fn new(
        shutdown_token: CancellationToken,
        config: Config,
        controllers: Vec<Box<dyn Controller>>,
        middlewares: Vec<Box<dyn Middleware>>,
    ) -> Arc<Self> {
        let timeout = config
            .api()
            .and_then(|api| api.timeout)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let router = build_router(controllers, middlewares, timeout);

        Arc::new(Self {
            shutdown_token,
            config,
            router,
        })
    }

    /// Router with every route and layer, for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Starts the HTTP server and returns once the shutdown token is cancelled.
    pub async fn listen_and_serve(&self) -> Result<()> {
        let name = self
            .config
            .api()
            .and_then(|api| api.name.clone())
            .unwrap_or_else(|| "homeboard".to_string());
        let port = self.config.port();
        let port = port.trim_start_matches(':');

        let addr: SocketAddr = format!("0.0.0.0:{}", port)
            .parse()
            .context("Failed to parse server address")?;

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind TCP listener on {}", addr))?;

        info!(
            component = "server",
            event = "started",
            name = %name,
            port = port,
            "server started"
        );

        let shutdown_token = self.shutdown_token.clone();
        let serve_future =
            axum::serve(listener, self.router.clone()).with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
            });

        if let Err(e) = serve_future.await {
            error!(
                component = "server",
                event = "listen_and_serve_failed",
                name = %name,
                port = port,
                error = %e,
                "server failed to listen and serve"
            );
            return Err(e.into());
        }

        info!(
            component = "server",
            event = "stopped",
            name = %name,
            port = port,
            "server stopped"
        );

        Ok(())
    }
}

/// Registers controllers, then wraps the router in the middlewares (the first
/// one listed runs first) and a request timeout.
pub fn build_router(
    controllers: Vec<Box<dyn Controller>>,
    middlewares: Vec<Box<dyn Middleware>>,
    timeout: Duration,
) -> Router {
    let mut router = Router::new();
    for controller in controllers {
        router = controller.add_route(router);
    }

    for middleware in middlewares.iter().rev() {
        router = middleware.apply(router);
    }

    router.layer(TimeoutLayer::new(timeout))
}

#[async_trait::async_trait]
impl Server for HttpServer {
    async fn listen_and_serve(&self) -> Result<()> {
        HttpServer::listen_and_serve(self).await
    }
}
