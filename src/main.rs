//! gatelog server binary
//!
//! Configuration: `GATELOG_CONFIG` (YAML file) plus `GATELOG_*` overrides.
//! Log filter: `RUST_LOG` (default `info,gatelog=debug`).

use anyhow::{Context, Result};
use gatelog::config::{KioskConfig, StorageBackend};
use gatelog::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gatelog=debug")),
        )
        .init();

    let config = KioskConfig::load().context("failed to load configuration")?;

    let store: Arc<dyn RecordStore> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory record store; records are lost on restart");
            Arc::new(InMemoryRecordStore::new())
        }
        StorageBackend::JsonLines => Arc::new(
            JsonLinesRecordStore::open(&config.storage.path)
                .await
                .context("failed to open registration log")?,
        ),
    };

    let reference = config.reference_point()?;
    tracing::info!(
        latitude = reference.point.latitude(),
        longitude = reference.point.longitude(),
        radius_meters = reference.radius_meters,
        timezone = %config.timezone,
        backend = store.backend_name(),
        "starting gatelog"
    );

    let addr = config.server.bind_addr.clone();
    ServerBuilder::new()
        .with_config(config)
        .with_shared_record_store(store)
        .serve(&addr)
        .await
}
