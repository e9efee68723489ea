// Dashboard application: slots, refresh loops and the read API.

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{self, Config, ConfigTrait};
use crate::http::client::{create_client, JsonClient};
use crate::schedule::Policy;
use crate::shutdown::GracefulShutdown;
use crate::storage::{DinnersSlot, TimetableSlot, TransportSlot};
use crate::time::Clock;
use crate::upstream::{
    AnthropicPlanner, DinnersProducer, HttpProductSource, HttpTimetableSource, TimetableProducer,
    TransportProducer,
};
use crate::workers::{Producer, Refresher};

use super::server::HttpServer;

pub const TIMETABLE: &str = "timetable";
pub const TRANSPORT: &str = "transport";
pub const DINNERS: &str = "dinners";

/// The three slots, shared by their refresh loop and the read API.
#[derive(Clone, Default)]
pub struct Slots {
    pub timetable: Arc<TimetableSlot>,
    pub transport: Arc<TransportSlot>,
    pub dinners: Arc<DinnersSlot>,
}

/// Composition root.
pub struct App {
    cfg: Config,
    shutdown_token: CancellationToken,
    clock: Arc<dyn Clock>,
    client: JsonClient,
    slots: Slots,
    server: Arc<HttpServer>,
}

impl App {
    pub fn new(shutdown_token: CancellationToken, cfg: Config, clock: Arc<dyn Clock>) -> Self {
        let slots = Slots::default();
        let server = Arc::new(HttpServer::new(shutdown_token.clone(), cfg.clone(), &slots));
        let client = JsonClient::new(create_client(), config::DEFAULT_TIMEOUT);

        Self {
            cfg,
            shutdown_token,
            clock,
            client,
            slots,
            server,
        }
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    pub fn router(&self) -> Router {
        self.server.router()
    }

    /// Starts every configured refresh loop and the server, registering each
    /// with `gsh`. Returns once they are spawned.
    pub fn serve(&self, gsh: &GracefulShutdown) -> Result<()> {
        let started = self.spawn_refreshers(gsh)?;

        let server = self.server.clone();
        let token = self.shutdown_token.clone();
        let server_gsh = gsh.clone();
        gsh.add(1);
        tokio::task::spawn(async move {
            if let Err(e) = server.listen_and_serve().await {
                error!(
                    component = "app",
                    scope = "server",
                    event = "serve_failed",
                    error = %e,
                    "server failed to serve"
                );
                // nothing to show without the API
                token.cancel();
            }
            server_gsh.done();
        });

        info!(component = "app", event = "started", loops = started, "application lifecycle");
        Ok(())
    }

    fn spawn_refreshers(&self, gsh: &GracefulShutdown) -> Result<usize> {
        let schedule = self.cfg.schedule();
        let stats_every = schedule.stats_interval();
        let mut started = 0;

        match self.cfg.timetable() {
            Some(cfg) => {
                let client = self.client.with_timeout(cfg.timeout.unwrap_or(config::DEFAULT_TIMEOUT));
                let source = HttpTimetableSource::new(
                    client,
                    &cfg.url,
                    cfg.user.clone(),
                    config::secret(&cfg.password_env),
                )
                .context("timetable source")?;
                let producer = TimetableProducer::new(source, self.clock.clone());
                let refresher = Refresher::new(
                    TIMETABLE,
                    self.slots.timetable.clone(),
                    producer,
                    schedule.timetable_policy(),
                    self.clock.clone(),
                );
                self.spawn(refresher, gsh, stats_every);
                started += 1;
            }
            None => disabled(TIMETABLE),
        }

        match self.cfg.transport() {
            Some(cfg) => {
                let client = self.client.with_timeout(cfg.timeout.unwrap_or(config::DEFAULT_TIMEOUT));
                let producer = TransportProducer::new(
                    client,
                    cfg.dlr_url.clone(),
                    cfg.rail_url.clone(),
                    cfg.london_bound.clone(),
                    cfg.limit.unwrap_or(config::DEFAULT_LIMIT),
                );
                let refresher = Refresher::new(
                    TRANSPORT,
                    self.slots.transport.clone(),
                    producer,
                    schedule.transport_policy(),
                    self.clock.clone(),
                );
                self.spawn(refresher, gsh, stats_every);
                started += 1;
            }
            None => disabled(TRANSPORT),
        }

        match self.cfg.dinners() {
            Some(cfg) => {
                let products = HttpProductSource::new(self.client.clone(), cfg.products_url.clone());
                let planner = AnthropicPlanner::new(
                    self.client
                        .with_timeout(cfg.timeout.unwrap_or(config::DEFAULT_PLANNER_TIMEOUT)),
                    cfg.api_url.clone().unwrap_or_else(|| config::DEFAULT_API_URL.to_string()),
                    config::secret(&cfg.api_key_env),
                    cfg.model.clone().unwrap_or_else(|| config::DEFAULT_MODEL.to_string()),
                    cfg.max_tokens.unwrap_or(config::DEFAULT_MAX_TOKENS),
                );
                let producer = DinnersProducer::new(products, planner, self.clock.clone());
                let refresher = Refresher::new(
                    DINNERS,
                    self.slots.dinners.clone(),
                    producer,
                    schedule.dinners_policy(),
                    self.clock.clone(),
                );
                self.spawn(refresher, gsh, stats_every);
                started += 1;
            }
            None => disabled(DINNERS),
        }

        Ok(started)
    }

    fn spawn<P, S>(&self, refresher: Refresher<P, S>, gsh: &GracefulShutdown, stats_every: Duration)
    where
        P: Producer + 'static,
        S: Policy + 'static,
    {
        let token = self.shutdown_token.clone();
        let gsh = gsh.clone();
        gsh.add(1);
        tokio::task::spawn(async move {
            refresher.run(token, stats_every).await;
            gsh.done();
        });
    }
}

fn disabled(source: &'static str) {
    warn!(
        component = "app",
        source = source,
        event = "source_disabled",
        "no config section, refresh loop not started"
    );
}
