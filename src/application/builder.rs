//! Entry Builder: resolves one configured market into an [`Entry`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::{
    match_outcomes, BinaryEntry, BinaryRegistrySide, CategoricalEntry, Entry, MarketConfig,
    MarketKind,
};
use crate::error::Result;
use crate::port::outbound::{MarketDataSource, OutcomeRegistry};

/// Builds a fresh entry for one market. One instance per worker.
#[async_trait]
pub trait BuildEntry: Send + Sync {
    async fn build(&self, market: &MarketConfig) -> Result<Entry>;
}

/// [`BuildEntry`] over an outcome registry and a market data source.
pub struct EntryBuilder {
    registry: Arc<dyn OutcomeRegistry>,
    market_data: Arc<dyn MarketDataSource>,
}

impl EntryBuilder {
    pub fn new(registry: Arc<dyn OutcomeRegistry>, market_data: Arc<dyn MarketDataSource>) -> Self {
        Self {
            registry,
            market_data,
        }
    }

    async fn build_binary(&self, market: &MarketConfig) -> Result<Entry> {
        let (outcome, side) = tokio::try_join!(
            self.registry.binary_outcome(&market.registry_market_id),
            self.market_data.binary_market(&market.market_slug),
        )?;

        debug!(
            name = %market.name,
            registry_title = %outcome.candidate,
            question = %side.question,
            "Resolved binary market"
        );

        Ok(Entry::binary(
            market.name.clone(),
            BinaryEntry {
                registry: BinaryRegistrySide {
                    market_id: market.registry_market_id.clone(),
                    title: outcome.candidate,
                    yes_token_id: outcome.yes_token_id,
                    no_token_id: outcome.no_token_id,
                },
                market: side,
            },
        ))
    }

    async fn build_categorical(&self, market: &MarketConfig) -> Result<Entry> {
        let (children, event) = tokio::try_join!(
            self.registry.categorical_outcomes(&market.registry_market_id),
            self.market_data.event(&market.market_slug),
        )?;

        let matched = match_outcomes(&children, &event.outcomes, event.end_date);

        info!(
            name = %market.name,
            registry_outcomes = children.len(),
            market_outcomes = event.outcomes.len(),
            pairs = matched.pairs.len(),
            unmatched_registry = matched.unmatched_registry.len(),
            unmatched_market = matched.unmatched_market.len(),
            "Matched categorical market"
        );

        Ok(Entry::categorical(
            market.name.clone(),
            CategoricalEntry {
                registry_market_id: market.registry_market_id.clone(),
                event_slug: market.market_slug.clone(),
                event_id: event.event_id,
                event_title: event.title,
                event_end_date: event.end_date,
                pairs: matched.pairs,
                unmatched_registry: matched.unmatched_registry,
                unmatched_market: matched.unmatched_market,
            },
        ))
    }
}

#[async_trait]
impl BuildEntry for EntryBuilder {
    async fn build(&self, market: &MarketConfig) -> Result<Entry> {
        match market.kind {
            MarketKind::Binary => self.build_binary(market).await,
            MarketKind::Categorical => self.build_categorical(market).await,
        }
    }
}
