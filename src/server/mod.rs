//! Server: owns the route table and runs the accept loop.
//!
//! Each accepted socket gets its own task running
//! parse → route lookup → handler → send → close. The route table is frozen
//! once [`Server::serve`] is called, since the server moves behind an `Arc`.

pub mod listener;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::router::{RouteError, Router};

pub struct Server {
    router: Router,
    config: Config,
}

impl Server {
    pub fn new(router: Router) -> Self {
        Self::with_config(router, Config::default())
    }

    pub fn with_config(router: Router, config: Config) -> Self {
        Self { router, config }
    }

    /// Mounts `router` under `base_path` on this server's route table.
    pub fn add_router(&mut self, base_path: &str, router: &Router) -> Result<(), RouteError> {
        self.router.add_router(base_path, router)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether some route would accept `method` on `target`.
    pub fn can_handle(&self, method: &str, target: &str) -> bool {
        self.router.can_handle(method, target)
    }

    /// Binds `host:port` and serves connections until the task is dropped.
    pub async fn serve(self, host: &str, port: u16) -> anyhow::Result<()> {
        let listener = TcpListener::bind((host, port)).await?;
        info!("Server started at http://{}", listener.local_addr()?);
        self.run(listener).await
    }

    /// Serves connections from an already bound listener.
    pub async fn run(self, listener: TcpListener) -> anyhow::Result<()> {
        info!(routes = self.router.len(), "serving {:?}", self.router);
        listener::run(Arc::new(self), listener).await
    }
}
