// HTTP server wiring for the dashboard application.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::http::{Controller, Middleware, Server as HttpServerTrait};

use super::app::Slots;

/// Read API server over the application's slots.
pub struct HttpServer {
    server: Arc<crate::http::HttpServer>,
}

impl HttpServer {
    pub fn new(ctx: CancellationToken, cfg: Config, slots: &Slots) -> Self {
        let controllers = Self::controllers(&cfg, slots);
        let middlewares = Self::middlewares();
        let server = crate::http::HttpServer::new(ctx, cfg, controllers, middlewares);
        Self { server }
    }

    /// Starts the HTTP server (blocking call).
    pub async fn listen_and_serve(&self) -> Result<()> {
        HttpServerTrait::listen_and_serve(self.server.as_ref()).await
    }

    pub fn router(&self) -> Router {
        self.server.router()
    }

    /// Returns all HTTP controllers for the server.
    fn controllers(cfg: &Config, slots: &Slots) -> Vec<Box<dyn Controller>> {
        use crate::controller;

        vec![
            // Source payloads
            Box::new(controller::SlotController::timetable(slots.timetable.clone())),
            Box::new(controller::SlotController::trains(slots.transport.clone())),
            Box::new(controller::SlotController::dinners(slots.dinners.clone())),
            // Per-source state
            Box::new(controller::StatusController::new(
                slots.timetable.clone(),
                slots.transport.clone(),
                slots.dinners.clone(),
            )),
            // Dashboard page
            Box::new(controller::IndexController::new(cfg.static_dir())),
            // Metrics endpoint
            Box::new(controller::PrometheusMetricsController::new()),
        ]
    }

    /// Returns the request middlewares for the server, executed in order.
    fn middlewares() -> Vec<Box<dyn Middleware>> {
        vec![Box::new(crate::middleware::TraceMiddleware::new())]
    }
}
