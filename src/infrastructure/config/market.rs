//! Configured market entries and their resolution into [`MarketConfig`].

use serde::Deserialize;

use crate::domain::market::{market_slug_from_url, registry_market_id_from_url};
use crate::domain::{MarketConfig, MarketId, MarketKind};
use crate::error::{Error, Result};

/// Registry ids may be written as TOML integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(u64),
    Text(String),
}

impl IdValue {
    fn to_market_id(&self) -> Option<MarketId> {
        match self {
            Self::Number(n) => Some(MarketId::from(*n)),
            Self::Text(s) if !s.trim().is_empty() => Some(MarketId::new(s.trim())),
            Self::Text(_) => None,
        }
    }
}

/// One `[[markets]]` table.
///
/// Identifiers may be given directly or as web URLs; direct values win.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarketEntryConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: MarketKind,
    #[serde(default)]
    pub registry_market_id: Option<IdValue>,
    #[serde(default)]
    pub market_slug: Option<String>,
    #[serde(default)]
    pub opinion_url: Option<String>,
    #[serde(default)]
    pub polymarket_url: Option<String>,
}

impl MarketEntryConfig {
    /// Resolve into a [`MarketConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMarket`] if either identifier is missing or
    /// cannot be extracted from its URL.
    pub fn resolve(&self) -> Result<MarketConfig> {
        let registry_market_id = match (
            self.registry_market_id.as_ref().and_then(IdValue::to_market_id),
            self.opinion_url.as_deref(),
        ) {
            (Some(id), _) => id,
            (None, Some(url)) => registry_market_id_from_url(url).map_err(|e| self.invalid(e))?,
            (None, None) => {
                return Err(self.invalid("missing registry_market_id or opinion_url"));
            }
        };

        let direct_slug = self
            .market_slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let market_slug = match (direct_slug, self.polymarket_url.as_deref()) {
            (Some(slug), _) => slug.to_string(),
            (None, Some(url)) => market_slug_from_url(url).map_err(|e| self.invalid(e))?,
            (None, None) => return Err(self.invalid("missing market_slug or polymarket_url")),
        };

        Ok(MarketConfig::new(
            self.name.clone(),
            self.kind,
            registry_market_id,
            market_slug,
        ))
    }

    fn invalid(&self, reason: impl ToString) -> Error {
        Error::InvalidMarket {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}
