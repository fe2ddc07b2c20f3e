//! Polymarket Gamma API configuration.

use serde::Deserialize;

pub const GAMMA_HOST: &str = "gamma-api.polymarket.com";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolymarketSettings {
    #[serde(default = "default_gamma_api_url")]
    pub gamma_api_url: String,
    /// Minimum spacing between requests to the Gamma host.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_gamma_api_url() -> String {
    format!("https://{GAMMA_HOST}")
}

const fn default_min_interval_ms() -> u64 {
    250
}

impl Default for PolymarketSettings {
    fn default() -> Self {
        Self {
            gamma_api_url: default_gamma_api_url(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}
