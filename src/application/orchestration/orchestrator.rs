//! Incremental build over a shared cache and a bounded worker pool.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::application::builder::BuildEntry;
use crate::application::cache::RegistryCache;
use crate::domain::{Entry, MarketConfig};
use crate::error::{Error, Result};

/// Creates one builder per worker. Each builder owns its network resources.
pub type BuilderFactory = Arc<dyn Fn() -> Arc<dyn BuildEntry> + Send + Sync>;

/// Tuning for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Upper bound on concurrent workers.
    pub workers: usize,
    /// Ignore cached entries and rebuild everything.
    pub refresh: bool,
    /// Serve the previous cached entry when a rebuild fails.
    pub keep_stale_on_error: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            workers: 8,
            refresh: false,
            keep_stale_on_error: true,
        }
    }
}

/// How each configured market was resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildCounts {
    pub cached: usize,
    pub built: usize,
    pub stale: usize,
    pub failed: usize,
}

impl fmt::Display for BuildCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cached, {} built, {} stale, {} failed",
            self.cached, self.built, self.stale, self.failed
        )
    }
}

/// Entries in configuration order plus per-market resolution counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub entries: Vec<Entry>,
    pub counts: BuildCounts,
}

type Task = (usize, MarketConfig);

/// Resolves configured markets into entries.
pub struct BuildOrchestrator {
    factory: BuilderFactory,
    cache: Arc<RegistryCache>,
    options: BuildOptions,
}

impl BuildOrchestrator {
    pub fn new(factory: BuilderFactory, cache: Arc<RegistryCache>, options: BuildOptions) -> Self {
        Self {
            factory,
            cache,
            options,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<RegistryCache> {
        &self.cache
    }

    /// Build an entry for every market. Failures never abort the build;
    /// failed markets fall back to a stale entry or are left out.
    pub async fn build(&self, markets: &[MarketConfig]) -> BuildReport {
        let mut slots: Vec<Option<Entry>> = vec![None; markets.len()];
        let mut counts = BuildCounts::default();
        let mut tasks: Vec<Task> = Vec::new();

        for (idx, market) in markets.iter().enumerate() {
            let key = market.cache_key();
            if !self.options.refresh {
                if let Some(entry) = self.cache.usable(&key) {
                    debug!(name = %market.name, key = %key, "Using cached entry");
                    slots[idx] = Some(entry.with_name(market.name.clone()));
                    counts.cached += 1;
                    continue;
                }
            }
            tasks.push((idx, market.clone()));
        }

        let mut results = self.run_workers(&tasks).await;

        for (idx, market) in &tasks {
            match results.remove(idx) {
                Some(Ok(entry)) => {
                    slots[*idx] = Some(entry);
                    counts.built += 1;
                }
                Some(Err(err)) => {
                    slots[*idx] = self.fallback(market, &err.to_string(), &mut counts);
                }
                None => {
                    slots[*idx] = self.fallback(market, "task did not complete", &mut counts);
                }
            }
        }

        info!(
            total = markets.len(),
            cached = counts.cached,
            built = counts.built,
            stale = counts.stale,
            failed = counts.failed,
            "Build complete"
        );

        BuildReport {
            entries: slots.into_iter().flatten().collect(),
            counts,
        }
    }

    /// Run `tasks` on up to `options.workers` workers and collect results by
    /// configuration index. A panicking build fails its own task only; tasks
    /// are absent only if a worker dies outside a build.
    async fn run_workers(&self, tasks: &[Task]) -> HashMap<usize, Result<Entry>> {
        let mut results = HashMap::with_capacity(tasks.len());
        if tasks.is_empty() {
            return results;
        }

        let worker_count = self.options.workers.max(1).min(tasks.len());
        info!(tasks = tasks.len(), workers = worker_count, "Building entries");

        let queue: Arc<Mutex<VecDeque<Task>>> =
            Arc::new(Mutex::new(tasks.iter().cloned().collect()));
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Result<Entry>)>();
        let mut workers = JoinSet::new();

        for worker_id in 0..worker_count {
            let queue = Arc::clone(&queue);
            let cache = Arc::clone(&self.cache);
            let factory = Arc::clone(&self.factory);
            let tx = tx.clone();

            workers.spawn(async move {
                let builder = factory();
                loop {
                    let next = queue.lock().pop_front();
                    let Some((idx, market)) = next else { break };

                    let task = {
                        let builder = Arc::clone(&builder);
                        let market = market.clone();
                        tokio::spawn(async move { builder.build(&market).await })
                    };
                    let result = match task.await {
                        Ok(result) => result,
                        Err(err) => {
                            error!(
                                worker = worker_id,
                                name = %market.name,
                                error = %err,
                                "Build task panicked"
                            );
                            Err(Error::Worker(err.to_string()))
                        }
                    };
                    if let Ok(entry) = &result {
                        cache.insert(market.cache_key(), entry.clone());
                        debug!(worker = worker_id, name = %market.name, "Built entry");
                    }
                    if tx.send((idx, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                error!(error = %err, "Build worker panicked");
            }
        }

        while let Some((idx, result)) = rx.recv().await {
            results.insert(idx, result);
        }
        results
    }

    fn fallback(&self, market: &MarketConfig, reason: &str, counts: &mut BuildCounts) -> Option<Entry> {
        let stale = if self.options.keep_stale_on_error {
            self.cache.usable(&market.cache_key())
        } else {
            None
        };

        match stale {
            Some(entry) => {
                warn!(name = %market.name, error = %reason, "Build failed, keeping cached entry");
                counts.stale += 1;
                Some(entry.with_name(market.name.clone()))
            }
            None => {
                error!(name = %market.name, error = %reason, "Build failed, dropping market");
                counts.failed += 1;
                None
            }
        }
    }
}
