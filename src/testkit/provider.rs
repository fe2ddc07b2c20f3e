//! In-memory providers for exercising the build pipeline without HTTP.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::{BuildEntry, BuilderFactory, EntryBuilder};
use crate::domain::{BinaryMarketSide, MarketId, RawOutcome};
use crate::error::{Error, Result};
use crate::port::outbound::{EventData, MarketDataSource, OutcomeRegistry};

/// Registry answering from fixed maps. Unknown ids are [`Error::NotFound`].
#[derive(Default)]
pub struct StaticRegistry {
    binary: HashMap<MarketId, RawOutcome>,
    categorical: HashMap<MarketId, Vec<RawOutcome>>,
    failing: HashSet<MarketId>,
    panicking: HashSet<MarketId>,
    calls: AtomicUsize,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(mut self, id: &str, outcome: RawOutcome) -> Self {
        self.binary.insert(id.into(), outcome);
        self
    }

    pub fn with_categorical(mut self, id: &str, outcomes: Vec<RawOutcome>) -> Self {
        self.categorical.insert(id.into(), outcomes);
        self
    }

    /// Answer requests for `id` with an upstream error.
    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.into());
        self
    }

    /// Panic on requests for `id`.
    pub fn panicking(mut self, id: &str) -> Self {
        self.panicking.insert(id.into());
        self
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, id: &MarketId) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking.contains(id) {
            panic!("scripted panic for registry market {id}");
        }
        if self.failing.contains(id) {
            return Err(Error::Upstream {
                source_name: "static",
                reason: format!("scripted failure for {id}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OutcomeRegistry for StaticRegistry {
    async fn binary_outcome(&self, market_id: &MarketId) -> Result<RawOutcome> {
        self.check(market_id)?;
        self.binary
            .get(market_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("registry market {market_id}")))
    }

    async fn categorical_outcomes(&self, market_id: &MarketId) -> Result<Vec<RawOutcome>> {
        self.check(market_id)?;
        self.categorical
            .get(market_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("registry market {market_id}")))
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// Market data answering from fixed maps keyed by slug.
#[derive(Default)]
pub struct StaticMarketData {
    markets: HashMap<String, BinaryMarketSide>,
    events: HashMap<String, EventData>,
    calls: AtomicUsize,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_market(mut self, side: BinaryMarketSide) -> Self {
        self.markets.insert(side.slug.clone(), side);
        self
    }

    pub fn with_event(mut self, event: EventData) -> Self {
        self.events.insert(event.slug.clone(), event);
        self
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for StaticMarketData {
    async fn binary_market(&self, slug: &str) -> Result<BinaryMarketSide> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.markets
            .get(slug)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("market {slug}")))
    }

    async fn event(&self, slug: &str) -> Result<EventData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.events
            .get(slug)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("event {slug}")))
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// Factory handing every worker an [`EntryBuilder`] over the same providers.
pub fn builder_factory(
    registry: Arc<StaticRegistry>,
    market_data: Arc<StaticMarketData>,
) -> BuilderFactory {
    Arc::new(move || -> Arc<dyn BuildEntry> {
        Arc::new(EntryBuilder::new(registry.clone(), market_data.clone()))
    })
}
