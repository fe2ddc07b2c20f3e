//! Opinion OpenAPI configuration.

use serde::Deserialize;

pub const OPINION_HOST: &str = "openapi.opinion.trade";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpinionSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Keys sent in the `apikey` header, rotated per request. Usually
    /// supplied through `OPINION_API_KEYS` rather than the config file.
    #[serde(default)]
    pub api_keys: Vec<String>,
    /// Minimum spacing between requests to the API host.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_api_url() -> String {
    format!("https://{OPINION_HOST}/openapi")
}

const fn default_min_interval_ms() -> u64 {
    250
}

impl Default for OpinionSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_keys: Vec::new(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}
