//! Outcome registry port (platform A).

use async_trait::async_trait;

use crate::domain::{MarketId, RawOutcome};
use crate::error::Result;

/// Enumerates a registry market's outcomes and their trade identifiers.
#[async_trait]
pub trait OutcomeRegistry: Send + Sync {
    /// The single yes/no outcome of a binary market. The outcome's
    /// `candidate` carries the market title.
    async fn binary_outcome(&self, market_id: &MarketId) -> Result<RawOutcome>;

    /// Child outcomes of a categorical market, in registry order.
    async fn categorical_outcomes(&self, market_id: &MarketId) -> Result<Vec<RawOutcome>>;

    /// Provider name for logging.
    fn source_name(&self) -> &'static str;
}
