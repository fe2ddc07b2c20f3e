//! Configured market pairs and their stable cache keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::id::MarketId;
use crate::error::{Error, Result};

/// Shape of a market on both platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    /// A single yes/no market.
    #[default]
    Binary,
    /// A parent market with several mutually exclusive child outcomes.
    Categorical,
}

impl MarketKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key identifying one configured market across runs.
///
/// Format: `<kind>|<registry market id>|<market slug>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn new(kind: MarketKind, registry_market_id: &MarketId, market_slug: &str) -> Self {
        Self(format!("{kind}|{registry_market_id}|{market_slug}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One market to resolve: a registry (platform A) market and the matching
/// platform B slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    pub name: String,
    pub kind: MarketKind,
    pub registry_market_id: MarketId,
    pub market_slug: String,
}

impl MarketConfig {
    pub fn new(
        name: impl Into<String>,
        kind: MarketKind,
        registry_market_id: impl Into<MarketId>,
        market_slug: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            registry_market_id: registry_market_id.into(),
            market_slug: market_slug.into(),
        }
    }

    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.kind, &self.registry_market_id, &self.market_slug)
    }
}

/// Query parameters that may carry the registry market id in a web URL.
const REGISTRY_ID_PARAMS: [&str; 3] = ["topicId", "marketId", "id"];

/// Extract the registry market id from a web URL such as
/// `https://app.opinion.trade/detail?topicId=151&type=multi`.
///
/// # Errors
///
/// Returns an error if the URL is malformed or has no numeric id parameter.
pub fn registry_market_id_from_url(raw: &str) -> Result<MarketId> {
    let url = Url::parse(raw)?;
    for key in REGISTRY_ID_PARAMS {
        let value = url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned());
        if let Some(id) = value.and_then(|v| v.trim().parse::<u64>().ok()) {
            return Ok(MarketId::from(id));
        }
    }
    Err(Error::InvalidMarket {
        name: raw.to_string(),
        reason: "no topicId/marketId/id query parameter".into(),
    })
}

/// Extract the market slug (last path segment) from a web URL such as
/// `https://polymarket.com/event/fed-decision-in-january?tid=1`.
///
/// # Errors
///
/// Returns an error if the URL is malformed or has an empty path.
pub fn market_slug_from_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw)?;
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidMarket {
            name: raw.to_string(),
            reason: "URL has no path segment to use as slug".into(),
        })
}
