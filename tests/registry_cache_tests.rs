//! End-to-end build tests over the JSON store with in-memory providers.

mod support;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use marketpair::adapter::outbound::json::JsonFileStore;
use marketpair::application::{BuildOptions, RefreshRegistry};
use marketpair::domain::{EntryBody, MarketConfig, SCHEMA_VERSION};
use marketpair::testkit::domain::{
    binary_config, binary_entry, binary_market_side, categorical_config, fed_event, outcome,
};
use marketpair::testkit::provider::{builder_factory, StaticMarketData, StaticRegistry};
use support::registry::Workspace;

fn providers() -> (Arc<StaticRegistry>, Arc<StaticMarketData>) {
    let registry = StaticRegistry::new()
        .with_binary("1", outcome("1", "BTC above 100k"))
        .with_binary("2", outcome("2", "ETH above 5k"))
        .with_categorical(
            "61",
            vec![
                outcome("611", "Decrease"),
                outcome("612", "Increase"),
                outcome("613", "No change"),
            ],
        );
    let market_data = StaticMarketData::new()
        .with_market(binary_market_side("btc"))
        .with_market(binary_market_side("eth"))
        .with_event(fed_event("fed"));
    (Arc::new(registry), Arc::new(market_data))
}

fn markets() -> Vec<MarketConfig> {
    vec![
        binary_config("BTC", "1", "btc"),
        categorical_config("Fed", "61", "fed"),
        binary_config("ETH", "2", "eth"),
    ]
}

fn refresh(
    ws: &Workspace,
    registry: Arc<StaticRegistry>,
    market_data: Arc<StaticMarketData>,
    options: BuildOptions,
) -> RefreshRegistry {
    RefreshRegistry::new(
        Arc::new(JsonFileStore::new(ws.registry_path())),
        builder_factory(registry, market_data),
        options,
        Some(Duration::hours(12)),
    )
}

#[tokio::test]
async fn persisted_registry_is_reused_without_provider_calls() {
    let ws = Workspace::new();
    let (registry, market_data) = providers();

    let first = refresh(&ws, registry.clone(), market_data.clone(), BuildOptions::default())
        .run(&markets())
        .await
        .unwrap();
    assert_eq!(first.counts.built, 3);
    let calls = (registry.calls(), market_data.calls());
    let written = ws.read_registry();

    let second = refresh(&ws, registry.clone(), market_data.clone(), BuildOptions::default())
        .run(&markets())
        .await
        .unwrap();

    assert_eq!(second.counts.cached, 3);
    assert_eq!((registry.calls(), market_data.calls()), calls);
    assert_eq!(ws.read_registry(), written);
}

#[tokio::test]
async fn registry_preserves_configuration_order() {
    let ws = Workspace::new();
    let (registry, market_data) = providers();

    refresh(&ws, registry, market_data, BuildOptions::default())
        .run(&markets())
        .await
        .unwrap();

    let names: Vec<String> = ws.read_registry().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["BTC", "Fed", "ETH"]);
}

#[tokio::test]
async fn categorical_pairs_are_persisted() {
    let ws = Workspace::new();
    let (registry, market_data) = providers();

    refresh(&ws, registry, market_data, BuildOptions::default())
        .run(&[categorical_config("Fed", "61", "fed")])
        .await
        .unwrap();

    let entries = ws.read_registry();
    let EntryBody::Categorical(cat) = &entries[0].body else {
        panic!("expected categorical entry");
    };
    let pairs: Vec<(&str, &str)> = cat
        .pairs
        .iter()
        .map(|p| (p.candidate.as_str(), p.market.candidate.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Decrease", "25 bps decrease"),
            ("Increase", "25 bps increase"),
            ("No change", "Fed holds rates"),
        ]
    );
    assert!(cat.unmatched_registry.is_empty());
    assert!(cat.unmatched_market.is_empty());
}

#[tokio::test]
async fn old_schema_entries_are_rebuilt() {
    let ws = Workspace::new();
    let mut old = binary_entry("BTC", "1", "btc");
    old.schema_version = SCHEMA_VERSION - 1;
    ws.write_registry(&[old]);
    let (registry, market_data) = providers();

    let summary = refresh(&ws, registry.clone(), market_data, BuildOptions::default())
        .run(&[binary_config("BTC", "1", "btc")])
        .await
        .unwrap();

    assert_eq!(summary.counts.built, 1);
    assert!(registry.calls() > 0);
    assert_eq!(ws.read_registry()[0].schema_version, SCHEMA_VERSION);
}

#[tokio::test]
async fn one_failing_market_does_not_block_the_rest() {
    let ws = Workspace::new();
    let (_, market_data) = providers();
    let registry = Arc::new(
        StaticRegistry::new()
            .with_binary("1", outcome("1", "BTC"))
            .failing("2"),
    );

    let summary = refresh(&ws, registry, market_data, BuildOptions::default())
        .run(&[binary_config("BTC", "1", "btc"), binary_config("ETH", "2", "eth")])
        .await
        .unwrap();

    assert_eq!(summary.counts.built, 1);
    assert_eq!(summary.counts.failed, 1);
    let names: Vec<String> = ws.read_registry().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["BTC"]);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_entry() {
    let ws = Workspace::new();
    ws.write_registry(&[binary_entry("ETH", "2", "eth")]);
    let (_, market_data) = providers();
    let registry = Arc::new(StaticRegistry::new().failing("2"));
    let options = BuildOptions {
        refresh: true,
        ..BuildOptions::default()
    };

    let summary = refresh(&ws, registry, market_data, options)
        .run(&[binary_config("ETH", "2", "eth")])
        .await
        .unwrap();

    assert_eq!(summary.counts.stale, 1);
    assert_eq!(ws.read_registry(), vec![binary_entry("ETH", "2", "eth")]);
}

#[tokio::test]
async fn expired_markets_are_pruned_on_save() {
    let ws = Workspace::new();
    let mut side = binary_market_side("eth");
    side.end_date = Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    let registry = Arc::new(
        StaticRegistry::new()
            .with_binary("1", outcome("1", "BTC"))
            .with_binary("2", outcome("2", "ETH")),
    );
    let market_data = Arc::new(
        StaticMarketData::new()
            .with_market(binary_market_side("btc"))
            .with_market(side),
    );

    let summary = refresh(&ws, registry, market_data, BuildOptions::default())
        .run(&[binary_config("BTC", "1", "btc"), binary_config("ETH", "2", "eth")])
        .await
        .unwrap();

    assert_eq!(summary.expired_entries, 1);
    assert_eq!(ws.read_registry().len(), 1);
}
