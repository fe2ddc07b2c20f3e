//! Persisted registry entries.
//!
//! An [`Entry`] is the resolved record for one configured market. Binary and
//! categorical markets carry different data, so the body is a two-variant
//! sum type tagged by `"type"` in JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MarketId, TokenId};
use super::market::{CacheKey, MarketKind};
use super::outcome::{RawOutcome, TokenPair};

/// Current on-disk schema. Entries written under any other version are
/// rebuilt regardless of completeness.
pub const SCHEMA_VERSION: u32 = 6;

/// Registry (platform A) side of a matched pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryLeg {
    pub market_id: MarketId,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Market data (platform B) side of a matched pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketLeg {
    pub market_id: MarketId,
    pub candidate: String,
    #[serde(default)]
    pub question: String,
    #[serde(flatten)]
    pub tokens: TokenPair,
    /// Own end date of the child market, else the parent event's.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Two equivalent outcomes on the two platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Registry label of the outcome.
    pub candidate: String,
    pub registry: RegistryLeg,
    pub market: MarketLeg,
}

impl MatchedPair {
    #[must_use]
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.market.end_date
    }
}

/// Registry side of a binary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryRegistrySide {
    pub market_id: MarketId,
    #[serde(default)]
    pub title: String,
    pub yes_token_id: Option<TokenId>,
    pub no_token_id: Option<TokenId>,
}

/// Market data side of a binary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryMarketSide {
    pub slug: String,
    #[serde(default)]
    pub market_id: Option<MarketId>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub outcomes: Vec<String>,
    #[serde(default)]
    pub clob_token_ids: Vec<TokenId>,
    #[serde(default)]
    pub yes_token_id: Option<TokenId>,
    #[serde(default)]
    pub no_token_id: Option<TokenId>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryEntry {
    pub registry: BinaryRegistrySide,
    pub market: BinaryMarketSide,
}

impl BinaryEntry {
    fn is_complete(&self) -> bool {
        let present = |t: &Option<TokenId>| t.as_ref().is_some_and(|t| !t.is_empty());
        present(&self.registry.yes_token_id)
            && present(&self.registry.no_token_id)
            && !self.market.clob_token_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalEntry {
    pub registry_market_id: MarketId,
    pub event_slug: String,
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub event_title: String,
    #[serde(default)]
    pub event_end_date: Option<DateTime<Utc>>,
    pub pairs: Vec<MatchedPair>,
    #[serde(default)]
    pub unmatched_registry: Vec<RawOutcome>,
    #[serde(default)]
    pub unmatched_market: Vec<RawOutcome>,
}

/// Kind-specific body of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryBody {
    Binary(BinaryEntry),
    Categorical(CategoricalEntry),
}

/// One persisted, fully resolved market record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub schema_version: u32,
    pub name: String,
    #[serde(flatten)]
    pub body: EntryBody,
}

impl Entry {
    pub fn binary(name: impl Into<String>, entry: BinaryEntry) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            name: name.into(),
            body: EntryBody::Binary(entry),
        }
    }

    pub fn categorical(name: impl Into<String>, entry: CategoricalEntry) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            name: name.into(),
            body: EntryBody::Categorical(entry),
        }
    }

    #[must_use]
    pub fn kind(&self) -> MarketKind {
        match &self.body {
            EntryBody::Binary(_) => MarketKind::Binary,
            EntryBody::Categorical(_) => MarketKind::Categorical,
        }
    }

    /// Platform B slug this entry was built from.
    #[must_use]
    pub fn slug(&self) -> &str {
        match &self.body {
            EntryBody::Binary(b) => &b.market.slug,
            EntryBody::Categorical(c) => &c.event_slug,
        }
    }

    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        match &self.body {
            EntryBody::Binary(b) => {
                CacheKey::new(MarketKind::Binary, &b.registry.market_id, &b.market.slug)
            }
            EntryBody::Categorical(c) => CacheKey::new(
                MarketKind::Categorical,
                &c.registry_market_id,
                &c.event_slug,
            ),
        }
    }

    /// Whether a cached copy can be served without refetching.
    ///
    /// Binary entries need both registry tokens and the market token list;
    /// categorical entries only need a pairs list, which may be empty.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        if self.schema_version != SCHEMA_VERSION {
            return false;
        }
        match &self.body {
            EntryBody::Binary(b) => b.is_complete(),
            EntryBody::Categorical(_) => true,
        }
    }

    /// Every resolution timestamp present at any level of the entry.
    #[must_use]
    pub fn end_dates(&self) -> Vec<DateTime<Utc>> {
        match &self.body {
            EntryBody::Binary(b) => b.market.end_date.into_iter().collect(),
            EntryBody::Categorical(c) => c
                .event_end_date
                .into_iter()
                .chain(c.pairs.iter().filter_map(MatchedPair::end_date))
                .chain(c.unmatched_market.iter().filter_map(|o| o.end_date))
                .collect(),
        }
    }

    #[must_use]
    pub fn latest_end_date(&self) -> Option<DateTime<Utc>> {
        self.end_dates().into_iter().max()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
