//! Canonical test configurations.
//!
//! Single source of truth for config files used across tests.

/// A complete config with one direct and one URL-based market.
pub const SAMPLE_TOML: &str = r#"
[output]
path = "token_registry.json"

[logging]
level = "debug"
format = "json"

[http]
timeout_ms = 5000
retry_max_attempts = 3

[build]
workers = 4
keep_expired = false
expiry_grace_hours = 6

[opinion]
min_interval_ms = 300

[polymarket]
min_interval_ms = 200

[[markets]]
name = "BTC 100k"
type = "binary"
registry_market_id = 12
market_slug = "btc-100k"

[[markets]]
name = "Fed January"
type = "categorical"
opinion_url = "https://app.opinion.trade/detail?topicId=61&type=multi"
polymarket_url = "https://polymarket.com/event/fed-decision-in-january"
"#;

/// A config pointing the store at `output` with every market in `markets`
/// given as `(name, kind, registry id, slug)`. Network hosts are
/// unroutable so a cache miss fails fast.
pub fn cache_only_toml(output: &str, markets: &[(&str, &str, &str, &str)]) -> String {
    let mut toml = format!(
        r#"
[output]
path = "{}"

[http]
timeout_ms = 200
connect_timeout_ms = 200
retry_max_attempts = 1

[opinion]
api_url = "http://127.0.0.1:9/openapi"
api_keys = ["test-key"]
min_interval_ms = 0

[polymarket]
gamma_api_url = "http://127.0.0.1:9"
min_interval_ms = 0
"#,
        output.replace('\\', "\\\\")
    );
    for (name, kind, id, slug) in markets {
        toml.push_str(&format!(
            "\n[[markets]]\nname = \"{name}\"\ntype = \"{kind}\"\nregistry_market_id = \"{id}\"\nmarket_slug = \"{slug}\"\n"
        ));
    }
    toml
}
