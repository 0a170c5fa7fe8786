//! brokerwire server binary: answers Kafka ApiVersions negotiation over TCP.
//!
//! Set BROKERWIRE_ADDR (default 0.0.0.0:9092), BROKERWIRE_MAX_FRAME_BYTES and
//! BROKERWIRE_READ_TIMEOUT_MS to override the defaults.

use brokerwire::{server, ApiRegistry, Dispatcher, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("brokerwire=info".parse()?))
        .init();

    let config = ServerConfig::from_env()?;
    let registry = Arc::new(ApiRegistry::with_api_versions().build()?);
    for api in registry.descriptors() {
        tracing::info!(
            api_key = api.api_key,
            min_version = api.min_version,
            max_version = api.max_version,
            "registered api"
        );
    }

    server::run_server(Dispatcher::new(registry), config).await?;
    Ok(())
}
