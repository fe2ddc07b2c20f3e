//! Opinion OpenAPI client.
//!
//! Binary markets are looked up at `/market/binary/{id}` with `/market/{id}`
//! as a fallback; categorical parents at `/market/categorical/{id}`, whose
//! `childMarkets` are the outcomes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use super::dto::{Envelope, OpinionMarket};
use super::settings::OpinionSettings;
use crate::adapter::outbound::http::FetchClient;
use crate::domain::{MarketId, RawOutcome, TokenId};
use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::{HttpRequest, OutcomeRegistry};

const SOURCE: &str = "opinion";

/// API keys handed out round-robin. Shared by every worker so that load is
/// spread evenly across keys.
#[derive(Debug, Default)]
pub struct ApiKeyRing {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl ApiKeyRing {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(Into::into)
            .map(|k: String| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The next key in rotation, or `None` if no key is configured.
    pub fn next_key(&self) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        Some(&self.keys[idx])
    }
}

/// Outcome registry backed by the Opinion OpenAPI.
pub struct OpinionClient {
    fetch: FetchClient,
    api_url: String,
    keys: Arc<ApiKeyRing>,
}

impl OpinionClient {
    pub fn new(fetch: FetchClient, settings: &OpinionSettings, keys: Arc<ApiKeyRing>) -> Self {
        Self {
            fetch,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            keys,
        }
    }

    fn request(&self, path: &str) -> Result<HttpRequest> {
        let key = self.keys.next_key().ok_or(ConfigError::MissingField {
            field: "opinion.api_keys",
        })?;
        let url = Url::parse(&format!("{}/{path}", self.api_url))?;
        Ok(HttpRequest::get(url)
            .header("apikey", key)
            .header("Accept", "application/json"))
    }

    async fn get_market(&self, path: &str) -> Result<OpinionMarket> {
        let request = self.request(path)?;
        let envelope: Envelope = self.fetch.get_json(&request).await?;

        if !envelope.is_success() {
            return Err(Error::Upstream {
                source_name: SOURCE,
                reason: format!("{path}: {}", envelope.status_text()),
            });
        }

        envelope.into_market().ok_or_else(|| Error::Upstream {
            source_name: SOURCE,
            reason: format!("{path}: response has no market payload"),
        })
    }
}

fn to_outcome(market: OpinionMarket, fallback_id: Option<&MarketId>) -> RawOutcome {
    let market_id = market
        .market_id
        .map(MarketId::new)
        .or_else(|| fallback_id.cloned())
        .unwrap_or_default();
    let mut outcome = RawOutcome::new(market_id, market.market_title.unwrap_or_default());
    outcome.yes_token_id = market.yes_token_id.map(TokenId::new);
    outcome.no_token_id = market.no_token_id.map(TokenId::new);
    outcome
}

#[async_trait]
impl OutcomeRegistry for OpinionClient {
    async fn binary_outcome(&self, market_id: &MarketId) -> Result<RawOutcome> {
        let paths = [
            format!("market/binary/{market_id}"),
            format!("market/{market_id}"),
        ];

        let mut last_err = None;
        for path in &paths {
            match self.get_market(path).await {
                Ok(market) => {
                    debug!(market_id = %market_id, path = %path, "Fetched registry market");
                    return Ok(to_outcome(market, Some(market_id)));
                }
                Err(err @ Error::Config(_)) => return Err(err),
                Err(err) => {
                    warn!(market_id = %market_id, path = %path, error = %err, "Registry lookup failed");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::NotFound(format!("opinion market {market_id}"))))
    }

    async fn categorical_outcomes(&self, market_id: &MarketId) -> Result<Vec<RawOutcome>> {
        let market = self
            .get_market(&format!("market/categorical/{market_id}"))
            .await?;
        let children: Vec<RawOutcome> = market
            .child_markets
            .into_iter()
            .map(|child| to_outcome(child, None))
            .collect();
        debug!(market_id = %market_id, children = children.len(), "Fetched registry children");
        Ok(children)
    }

    fn source_name(&self) -> &'static str {
        SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::http::{HostRateLimiter, RetryPolicy};
    use crate::testkit::http::ScriptedTransport;
    use serde_json::json;
    use std::time::Duration;

    const BASE: &str = "https://openapi.opinion.trade/openapi";

    fn client(transport: &Arc<ScriptedTransport>, keys: &[&str]) -> OpinionClient {
        let fetch = FetchClient::new(
            transport.clone(),
            Arc::new(HostRateLimiter::unlimited()),
            RetryPolicy {
                max_attempts: 1,
                backoff_base: Duration::ZERO,
                jitter: Duration::ZERO,
            },
        );
        OpinionClient::new(
            fetch,
            &OpinionSettings::default(),
            Arc::new(ApiKeyRing::new(keys.iter().copied())),
        )
    }

    // ---- Key ring ----

    #[test]
    fn key_ring_rotates() {
        let ring = ApiKeyRing::new(["a", " ", "b"]);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.next_key(), Some("a"));
        assert_eq!(ring.next_key(), Some("b"));
        assert_eq!(ring.next_key(), Some("a"));
    }

    #[test]
    fn empty_key_ring_yields_nothing() {
        assert_eq!(ApiKeyRing::new(Vec::<String>::new()).next_key(), None);
    }

    // ---- Binary ----

    #[tokio::test]
    async fn binary_outcome_from_primary_endpoint() {
        let transport = Arc::new(ScriptedTransport::new().json(
            &format!("{BASE}/market/binary/12"),
            &json!({"code": 0, "result": {"data": {
                "marketId": 12, "marketTitle": "BTC 100k", "yesTokenId": "y", "noTokenId": "n"
            }}}),
        ));

        let outcome = client(&transport, &["k1"])
            .binary_outcome(&"12".into())
            .await
            .unwrap();

        assert_eq!(outcome.candidate, "BTC 100k");
        assert_eq!(outcome.tokens().unwrap().yes_token_id.as_str(), "y");

        let requests = transport.requests();
        assert!(requests[0]
            .headers
            .contains(&("apikey".to_string(), "k1".to_string())));
    }

    #[tokio::test]
    async fn binary_outcome_falls_back_to_generic_endpoint() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .json(
                    &format!("{BASE}/market/binary/12"),
                    &json!({"code": 404, "msg": "not binary"}),
                )
                .json(
                    &format!("{BASE}/market/12"),
                    &json!({"code": 0, "result": {"marketTitle": "BTC", "yesTokenId": "y", "noTokenId": "n"}}),
                ),
        );

        let outcome = client(&transport, &["k1", "k2"])
            .binary_outcome(&"12".into())
            .await
            .unwrap();

        // marketId missing from payload: the requested id is kept.
        assert_eq!(outcome.market_id.as_str(), "12");
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1]
            .headers
            .contains(&("apikey".to_string(), "k2".to_string())));
    }

    #[tokio::test]
    async fn binary_outcome_reports_last_error() {
        let transport = Arc::new(ScriptedTransport::new());
        let err = client(&transport, &["k"])
            .binary_outcome(&"12".into())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert_eq!(transport.total(), 2);
    }

    #[tokio::test]
    async fn missing_api_key_is_config_error() {
        let transport = Arc::new(ScriptedTransport::new());
        let err = client(&transport, &[])
            .binary_outcome(&"12".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { .. })
        ));
        assert_eq!(transport.total(), 0);
    }

    // ---- Categorical ----

    #[tokio::test]
    async fn categorical_children_become_outcomes() {
        let transport = Arc::new(ScriptedTransport::new().json(
            &format!("{BASE}/market/categorical/61"),
            &json!({"errno": 0, "result": {"data": {"marketId": 61, "childMarkets": [
                {"marketId": 611, "marketTitle": "Decrease", "yesTokenId": "dy", "noTokenId": "dn"},
                {"marketId": 612, "marketTitle": "No change"}
            ]}}}),
        ));

        let children = client(&transport, &["k"])
            .categorical_outcomes(&"61".into())
            .await
            .unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].candidate, "Decrease");
        assert!(children[0].is_tradeable());
        assert!(!children[1].is_tradeable());
    }

    #[tokio::test]
    async fn categorical_upstream_error_is_not_retried() {
        let url = format!("{BASE}/market/categorical/61");
        let transport = Arc::new(
            ScriptedTransport::new().json(&url, &json!({"code": 500, "msg": "internal"})),
        );

        let err = client(&transport, &["k"])
            .categorical_outcomes(&"61".into())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Upstream { source_name: "opinion", .. }));
        assert_eq!(transport.count(&url), 1);
    }
}
