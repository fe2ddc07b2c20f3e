//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for outcomes, market sides, events,
//! and whole entries so tests focus on assertions rather than construction
//! boilerplate.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    BinaryEntry, BinaryMarketSide, BinaryRegistrySide, CategoricalEntry, Entry, MarketConfig,
    MarketKind, MarketLeg, MatchedPair, RawOutcome, RegistryLeg, TokenPair,
};
use crate::port::outbound::EventData;

/// Fixed timestamp far in the future so fixtures never expire.
pub fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()
}

/// A tradeable outcome with tokens `{id}-yes` / `{id}-no`.
pub fn outcome(id: &str, label: &str) -> RawOutcome {
    RawOutcome::new(id, label).with_tokens(format!("{id}-yes"), format!("{id}-no"))
}

/// A complete binary market side for `slug`.
pub fn binary_market_side(slug: &str) -> BinaryMarketSide {
    BinaryMarketSide {
        slug: slug.to_string(),
        market_id: Some(format!("pm-{slug}").into()),
        question: format!("Will {slug} resolve yes?"),
        outcomes: vec!["Yes".into(), "No".into()],
        clob_token_ids: vec![format!("{slug}-yes").into(), format!("{slug}-no").into()],
        yes_token_id: Some(format!("{slug}-yes").into()),
        no_token_id: Some(format!("{slug}-no").into()),
        end_date: Some(far_future()),
    }
}

/// A rate-decision event with three tradeable child markets.
pub fn fed_event(slug: &str) -> EventData {
    EventData {
        event_id: "evt-1".into(),
        slug: slug.to_string(),
        title: "Fed decision in January?".into(),
        end_date: Some(far_future()),
        outcomes: vec![
            outcome("b1", "25 bps decrease"),
            outcome("b2", "25 bps increase"),
            outcome("b3", "Fed holds rates"),
        ],
    }
}

/// A usable binary entry whose cache key is `binary|{registry_id}|{slug}`.
pub fn binary_entry(name: &str, registry_id: &str, slug: &str) -> Entry {
    Entry::binary(
        name,
        BinaryEntry {
            registry: BinaryRegistrySide {
                market_id: registry_id.into(),
                title: name.to_string(),
                yes_token_id: Some(format!("{registry_id}-yes").into()),
                no_token_id: Some(format!("{registry_id}-no").into()),
            },
            market: binary_market_side(slug),
        },
    )
}

/// A categorical entry with one matched pair, keyed
/// `categorical|{registry_id}|{slug}`.
pub fn categorical_entry(name: &str, registry_id: &str, slug: &str) -> Entry {
    Entry::categorical(
        name,
        CategoricalEntry {
            registry_market_id: registry_id.into(),
            event_slug: slug.to_string(),
            event_id: "evt-1".into(),
            event_title: name.to_string(),
            event_end_date: Some(far_future()),
            pairs: vec![MatchedPair {
                candidate: "Decrease".into(),
                registry: RegistryLeg {
                    market_id: format!("{registry_id}1").into(),
                    tokens: TokenPair::new("a-yes", "a-no"),
                },
                market: MarketLeg {
                    market_id: "b1".into(),
                    candidate: "25 bps decrease".into(),
                    question: String::new(),
                    tokens: TokenPair::new("b-yes", "b-no"),
                    end_date: Some(far_future()),
                },
            }],
            unmatched_registry: vec![],
            unmatched_market: vec![],
        },
    )
}

/// A binary market config.
pub fn binary_config(name: &str, registry_id: &str, slug: &str) -> MarketConfig {
    MarketConfig::new(name, MarketKind::Binary, registry_id, slug)
}

/// A categorical market config.
pub fn categorical_config(name: &str, registry_id: &str, slug: &str) -> MarketConfig {
    MarketConfig::new(name, MarketKind::Categorical, registry_id, slug)
}
