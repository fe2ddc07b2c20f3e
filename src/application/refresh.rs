//! The registry refresh use case: load, build, prune, save.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::cache::RegistryCache;
use super::orchestration::{BuildCounts, BuildOptions, BuildOrchestrator, BuilderFactory};
use crate::domain::{prune_expired, Entry, MarketConfig, PruneReport};
use crate::error::Result;
use crate::port::outbound::RegistryStore;

/// Outcome of one refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub counts: BuildCounts,
    pub expired_entries: usize,
    pub expired_children: usize,
    /// Entries written to the store, in configuration order.
    pub entries: Vec<Entry>,
}

/// Rebuilds the persisted registry from configured markets.
pub struct RefreshRegistry {
    store: Arc<dyn RegistryStore>,
    factory: BuilderFactory,
    options: BuildOptions,
    /// Grace window for pruning; `None` keeps expired entries.
    expiry_grace: Option<Duration>,
}

impl RefreshRegistry {
    pub fn new(
        store: Arc<dyn RegistryStore>,
        factory: BuilderFactory,
        options: BuildOptions,
        expiry_grace: Option<Duration>,
    ) -> Self {
        Self {
            store,
            factory,
            options,
            expiry_grace,
        }
    }

    /// Run against the current wall clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written. Per-market
    /// build failures are reported in the summary instead.
    pub async fn run(&self, markets: &[MarketConfig]) -> Result<RefreshSummary> {
        self.run_at(markets, Utc::now()).await
    }

    /// Run with pruning evaluated at `now`.
    ///
    /// # Errors
    ///
    /// See [`RefreshRegistry::run`].
    pub async fn run_at(&self, markets: &[MarketConfig], now: DateTime<Utc>) -> Result<RefreshSummary> {
        let previous = self.store.load()?;
        info!(entries = previous.len(), markets = markets.len(), "Loaded registry");

        let cache = Arc::new(RegistryCache::from_entries(previous));
        let orchestrator = BuildOrchestrator::new(Arc::clone(&self.factory), cache, self.options);
        let report = orchestrator.build(markets).await;

        let mut summary = RefreshSummary {
            counts: report.counts,
            ..RefreshSummary::default()
        };

        summary.entries = match self.expiry_grace {
            Some(grace) => {
                let pruned = prune_expired(report.entries, now, grace);
                log_prune(&pruned);
                summary.expired_entries = pruned.removed_entries.len();
                summary.expired_children = pruned.removed_children.len();
                pruned.kept
            }
            None => report.entries,
        };

        self.store.save(&summary.entries)?;
        info!(entries = summary.entries.len(), "Saved registry");

        Ok(summary)
    }
}

fn log_prune(report: &PruneReport) {
    for child in &report.removed_children {
        info!(
            parent = %child.parent,
            list = %child.list,
            market_id = %child.market_id,
            candidate = %child.candidate,
            end_date = ?child.end_date,
            "Pruned expired outcome"
        );
    }
    for entry in &report.removed_entries {
        info!(
            name = %entry.name,
            kind = %entry.kind,
            slug = %entry.slug,
            latest_end = ?entry.latest_end,
            reason = %entry.reason,
            "Pruned expired entry"
        );
    }
    if !report.is_noop() {
        info!(
            entries = report.removed_entries.len(),
            outcomes = report.removed_children.len(),
            "Expiry pruning complete"
        );
    }
}
