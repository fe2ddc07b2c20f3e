//! Gamma API client.
//!
//! Slugs copied from web URLs often carry a numeric suffix (`...-395`) the
//! API does not know, so every slug lookup retries once without it. Binary
//! lookups fall back to the first market of the event with that slug.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::candidate::candidate_label;
use super::response::{GammaEvent, GammaMarket};
use super::settings::PolymarketSettings;
use crate::adapter::outbound::http::FetchClient;
use crate::domain::{BinaryMarketSide, MarketId, RawOutcome, TokenId};
use crate::error::{Error, FetchError, Result};
use crate::port::outbound::{EventData, HttpRequest, MarketDataSource};

const SOURCE: &str = "polymarket";

static RE_NUMERIC_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)-\d+$").unwrap());

/// Slug with a trailing `-<digits>` removed, if it has one.
#[must_use]
pub fn alt_slug(slug: &str) -> Option<&str> {
    RE_NUMERIC_SUFFIX
        .captures(slug)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Market data source backed by the Gamma API.
pub struct GammaClient {
    fetch: FetchClient,
    gamma_url: String,
}

impl GammaClient {
    pub fn new(fetch: FetchClient, settings: &PolymarketSettings) -> Self {
        Self {
            fetch,
            gamma_url: settings.gamma_api_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, path: &str) -> Result<HttpRequest> {
        let url = Url::parse(&format!("{}/{path}", self.gamma_url))?;
        Ok(HttpRequest::get(url).header("Accept", "application/json"))
    }

    /// GET `path`, mapping 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let request = self.request(path)?;
        match self.fetch.get_json(&request).await {
            Ok(value) => Ok(Some(value)),
            Err(FetchError::Status { status: 404, .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// GET `{prefix}/{slug}`, then `{prefix}/{alt slug}` on 404.
    async fn get_by_slug<T: DeserializeOwned>(&self, prefix: &str, slug: &str) -> Result<Option<T>> {
        if let Some(found) = self.get_optional(&format!("{prefix}/{slug}")).await? {
            return Ok(Some(found));
        }
        match alt_slug(slug) {
            Some(alt) => {
                debug!(slug, alt, "Slug not found, trying without numeric suffix");
                self.get_optional(&format!("{prefix}/{alt}")).await
            }
            None => Ok(None),
        }
    }

    async fn get_event(&self, slug: &str) -> Result<GammaEvent> {
        self.get_by_slug("events/slug", slug)
            .await?
            .ok_or_else(|| Error::NotFound(format!("polymarket event '{slug}'")))
    }

    async fn get_market(&self, slug: &str) -> Result<GammaMarket> {
        if let Some(market) = self.get_by_slug("markets/slug", slug).await? {
            return Ok(market);
        }

        let event = self.get_event(slug).await?;
        event
            .markets
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream {
                source_name: SOURCE,
                reason: format!("event '{slug}' has no markets"),
            })
    }

    /// End date of a market fetched by id. Lookup failures are logged and
    /// treated as unknown.
    async fn market_end_date(&self, market_id: &str) -> Option<DateTime<Utc>> {
        let request = match self.request(&format!("markets/{market_id}")) {
            Ok(request) => request,
            Err(err) => {
                warn!(market_id, error = %err, "Invalid market URL");
                return None;
            }
        };
        match self.fetch.get_json::<GammaMarket>(&request).await {
            Ok(market) => market.end_date(),
            Err(err) => {
                warn!(market_id, error = %err, "Failed to backfill market end date");
                None
            }
        }
    }

    async fn to_outcome(
        &self,
        market: GammaMarket,
        end_dates: &mut HashMap<String, Option<DateTime<Utc>>>,
    ) -> RawOutcome {
        let candidate = candidate_label(&market);
        let market_id = market.id.clone().unwrap_or_default();

        let mut end_date = market.end_date();
        if end_date.is_none() && !market_id.is_empty() {
            end_date = match end_dates.get(&market_id) {
                Some(cached) => *cached,
                None => {
                    let fetched = self.market_end_date(&market_id).await;
                    end_dates.insert(market_id.clone(), fetched);
                    fetched
                }
            };
        }

        let mut outcome = RawOutcome::new(MarketId::new(market_id), candidate)
            .with_end_date(end_date);
        if let Some(question) = market.question.as_deref().filter(|q| !q.trim().is_empty()) {
            outcome = outcome.with_question(question);
        }
        if let Some((yes, no)) = market.yes_no_tokens() {
            outcome.yes_token_id = Some(TokenId::new(yes));
            outcome.no_token_id = Some(TokenId::new(no));
        }
        outcome
    }
}

#[async_trait]
impl MarketDataSource for GammaClient {
    async fn binary_market(&self, slug: &str) -> Result<BinaryMarketSide> {
        let market = self.get_market(slug).await?;
        debug!(slug, market_id = ?market.id, "Fetched market");
        Ok(market.into_binary_side(slug))
    }

    async fn event(&self, slug: &str) -> Result<EventData> {
        let event = self.get_event(slug).await?;
        let end_date = event.end_date();

        let mut end_dates = HashMap::new();
        let mut outcomes = Vec::with_capacity(event.markets.len());
        for market in event.markets {
            outcomes.push(self.to_outcome(market, &mut end_dates).await);
        }

        debug!(slug, outcomes = outcomes.len(), "Fetched event");
        Ok(EventData {
            event_id: event.id.unwrap_or_default(),
            slug: event.slug.unwrap_or_else(|| slug.to_string()),
            title: event.title.unwrap_or_default(),
            end_date,
            outcomes,
        })
    }

    fn source_name(&self) -> &'static str {
        SOURCE
    }
}
