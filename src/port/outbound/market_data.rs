//! Market data port (platform B).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BinaryMarketSide, RawOutcome};
use crate::error::Result;

/// A multi-outcome event and its child markets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    pub event_id: String,
    pub slug: String,
    pub title: String,
    /// Fallback for child outcomes without their own end date.
    pub end_date: Option<DateTime<Utc>>,
    pub outcomes: Vec<RawOutcome>,
}

/// Resolves platform B slugs into market data.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Binary market identified by `slug`.
    async fn binary_market(&self, slug: &str) -> Result<BinaryMarketSide>;

    /// Categorical event identified by `slug`, with one outcome per child
    /// market.
    async fn event(&self, slug: &str) -> Result<EventData>;

    /// Provider name for logging.
    fn source_name(&self) -> &'static str;
}
