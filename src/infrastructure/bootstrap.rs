//! Composition root: wires providers, the store, and the build pipeline
//! from a [`Config`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::http::{FetchClient, HostRateLimiter, ReqwestTransport};
use crate::adapter::outbound::json::store::JsonFileStore;
use crate::adapter::outbound::opinion::{ApiKeyRing, OpinionClient};
use crate::adapter::outbound::polymarket::GammaClient;
use crate::application::{BuildEntry, BuilderFactory, EntryBuilder, RefreshRegistry, RefreshSummary};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Factory creating one [`EntryBuilder`] per worker.
///
/// Every builder gets its own HTTP transport (and connection pool). The
/// per-host limiter and the API key ring are shared across all of them.
pub fn builder_factory(config: &Config) -> BuilderFactory {
    let limiter = Arc::new(HostRateLimiter::new(config.host_intervals()));
    let keys = Arc::new(ApiKeyRing::new(config.opinion.api_keys.iter().cloned()));
    if keys.is_empty() {
        warn!("No Opinion API key configured; registry lookups will fail");
    }

    let policy = config.http.retry_policy();
    let http = config.http.clone();
    let opinion = config.opinion.clone();
    let polymarket = config.polymarket.clone();

    Arc::new(move || -> Arc<dyn BuildEntry> {
        let transport = Arc::new(ReqwestTransport::from_settings(&http));
        let fetch = FetchClient::new(transport, Arc::clone(&limiter), policy);
        let registry = OpinionClient::new(fetch.clone(), &opinion, Arc::clone(&keys));
        let market_data = GammaClient::new(fetch, &polymarket);
        Arc::new(EntryBuilder::new(Arc::new(registry), Arc::new(market_data)))
    })
}

/// The refresh use case over the configured JSON store.
pub fn refresh_registry(config: &Config) -> RefreshRegistry {
    RefreshRegistry::new(
        Arc::new(JsonFileStore::new(&config.output.path)),
        builder_factory(config),
        config.build_options(),
        config.expiry_grace(),
    )
}

/// Resolve every configured market and persist the registry.
///
/// # Errors
///
/// Returns an error if the registry file cannot be read or written.
pub async fn run_build(config: &Config) -> Result<RefreshSummary> {
    let markets = config.markets();
    info!(
        markets = markets.len(),
        output = %config.output.path.display(),
        workers = config.build.workers,
        refresh = config.build.refresh,
        "Starting build"
    );

    refresh_registry(config).run(&markets).await
}
