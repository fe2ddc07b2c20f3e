//! Gamma API response types.
//!
//! Gamma is inconsistent about list fields: `outcomes` and `clobTokenIds`
//! arrive either as JSON arrays or as JSON-encoded strings. Both are
//! accepted here and normalized to `Vec<String>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::domain::{BinaryMarketSide, MarketId, TokenId};

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode a list given as a JSON array or a JSON-encoded string.
fn json_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
        Some(Value::String(raw)) => match serde_json::from_str::<Vec<Value>>(raw) {
            Ok(items) => items.iter().filter_map(value_to_string).collect(),
            Err(err) => {
                debug!(error = %err, raw = %raw, "Failed to parse JSON-encoded list");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

/// Parse a Gamma timestamp. Accepts RFC 3339, naive date-times (taken as
/// UTC) and bare dates (midnight UTC).
#[must_use]
pub fn parse_end_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Market from `/markets/slug/{slug}`, `/markets/{id}` or an event's
/// `markets` list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    /// Outcome names, e.g. `["Yes", "No"]`.
    #[serde(default)]
    pub outcomes: Option<Value>,
    #[serde(default)]
    pub clob_token_ids: Option<Value>,
    /// Short option label shown for child markets of an event.
    #[serde(default, alias = "group_item_title", alias = "groupTitle")]
    pub group_item_title: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
}

impl GammaMarket {
    #[must_use]
    pub fn outcome_names(&self) -> Vec<String> {
        json_list(self.outcomes.as_ref())
    }

    #[must_use]
    pub fn token_ids(&self) -> Vec<String> {
        json_list(self.clob_token_ids.as_ref())
    }

    #[must_use]
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date.as_deref().and_then(parse_end_date)
    }

    /// Yes/no token ids of a two-outcome market. Order follows the outcome
    /// names: swapped only when they read `["No", "Yes"]`.
    #[must_use]
    pub fn yes_no_tokens(&self) -> Option<(String, String)> {
        let outcomes = self.outcome_names();
        let tokens = self.token_ids();
        if outcomes.len() != 2 || tokens.len() != 2 {
            return None;
        }
        let first = outcomes[0].trim().to_lowercase();
        let second = outcomes[1].trim().to_lowercase();
        if first == "no" && second == "yes" {
            Some((tokens[1].clone(), tokens[0].clone()))
        } else {
            Some((tokens[0].clone(), tokens[1].clone()))
        }
    }

    #[must_use]
    pub fn group_item_title(&self) -> Option<&str> {
        self.group_item_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Binary market side of an entry for `slug`.
    #[must_use]
    pub fn into_binary_side(self, slug: &str) -> BinaryMarketSide {
        let tokens = self.yes_no_tokens();
        BinaryMarketSide {
            slug: slug.to_string(),
            market_id: self.id.clone().map(MarketId::new),
            question: self.question.clone().unwrap_or_default(),
            outcomes: self.outcome_names(),
            clob_token_ids: self.token_ids().into_iter().map(TokenId::new).collect(),
            yes_token_id: tokens.as_ref().map(|(yes, _)| TokenId::new(yes.as_str())),
            no_token_id: tokens.map(|(_, no)| TokenId::new(no)),
            end_date: self.end_date(),
        }
    }
}

/// Event from `/events/slug/{slug}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaEvent {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub markets: Vec<GammaMarket>,
}

impl GammaEvent {
    #[must_use]
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date.as_deref().and_then(parse_end_date)
    }
}
