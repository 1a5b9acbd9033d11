//! # Trellis Server
//!
//! HTTP host for the dispatcher: `Axum` accepts connections, every request is translated into a
//! [`RequestView`](trellis_core::RequestView) and handed to the
//! [`Dispatcher`](trellis_core::Dispatcher) built from a component catalog.
//!
//! ## Example
//! ```no_run
//! use trellis_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .catalog(trellis_demo::catalog())
//!         .root(trellis_demo::ROOT)
//!         .port(8080)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod router;

pub use router::ServerState;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use trellis_config::AppConfig;
use trellis_core::{Application, Catalog, Dispatcher};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: AppConfig,
    catalog: Catalog,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Components available to the scanner.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.cfg.scan.root = root.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    pub fn context_path(mut self, context_path: impl Into<String>) -> Self {
        self.cfg.server.context_path = context_path.into();
        self
    }

    /// Scans the catalog, builds the registry, wires it and compiles the route table.
    ///
    /// # Errors
    /// Fails when the scan root is unknown, a route pattern does not compile, or strict mode
    /// rejects the component graph.
    pub fn build(self) -> Result<Server> {
        info!(root = %self.cfg.scan.root, strict = self.cfg.scan.strict, "Initializing dispatcher");

        let application = Application::builder()
            .strict(self.cfg.scan.strict)
            .initialize(&self.catalog, &self.cfg.scan.root)
            .with_context(|| format!("Failed to initialize components under `{}`", self.cfg.scan.root))?;

        info!(
            components = application.registry().len(),
            routes = application.routes().len(),
            "Dispatcher ready"
        );

        Ok(Server { cfg: self.cfg, dispatcher: Arc::new(Dispatcher::new(application)) })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    cfg: AppConfig,
    dispatcher: Arc<Dispatcher>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The `Axum` router serving this instance.
    pub fn router(&self) -> Router {
        router::init(ServerState {
            dispatcher: Arc::clone(&self.dispatcher),
            context_path: Arc::from(self.cfg.server.context_path.as_str()),
        })
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn run(self) -> Result<()> {
        let address = self.cfg.server.socket_addr();
        let app = self.router();

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        info!("Starting HTTP server on http://{address}");

        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
