//! ServerBuilder for fluent API to build the kiosk HTTP server

use super::host::KioskHost;
use super::router::build_routes;
use crate::config::KioskConfig;
use crate::core::store::RecordStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the kiosk server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(KioskConfig::load()?)
///     .with_record_store(InMemoryRecordStore::new())
///     .serve("0.0.0.0:8080")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: KioskConfig,
    record_store: Option<Arc<dyn RecordStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: KioskConfig::default(),
            record_store: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the kiosk configuration
    pub fn with_config(mut self, config: KioskConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the record store (required)
    pub fn with_record_store(self, store: impl RecordStore + 'static) -> Self {
        self.with_shared_record_store(Arc::new(store))
    }

    /// Set an already shared record store (required)
    pub fn with_shared_record_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.record_store = Some(store);
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(mut self) -> Result<KioskHost> {
        let store = self
            .record_store
            .take()
            .ok_or_else(|| anyhow::anyhow!("RecordStore is required. Call .with_record_store()"))?;

        KioskHost::new(self.config, store)
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        Ok(build_routes(host, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
