//! Opinion OpenAPI response types.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept an identifier given either as a JSON string or a number.
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

/// Top-level response wrapper.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub errno: Option<Value>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub result: Option<ResultBody>,
}

impl Envelope {
    /// Status code, whichever of `code` / `errno` is present.
    fn status(&self) -> Option<&Value> {
        self.code
            .as_ref()
            .filter(|v| !v.is_null())
            .or_else(|| self.errno.as_ref().filter(|v| !v.is_null()))
    }

    /// True when the status code is absent or zero.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self.status() {
            None => true,
            Some(Value::Number(n)) => n.as_i64() == Some(0),
            Some(Value::String(s)) => s.trim() == "0",
            Some(_) => false,
        }
    }

    #[must_use]
    pub fn status_text(&self) -> String {
        let code = self.status().map_or_else(|| "none".into(), Value::to_string);
        match &self.msg {
            Some(msg) => format!("code {code}: {msg}"),
            None => format!("code {code}"),
        }
    }

    /// The market payload, from `result.data` or `result` itself.
    #[must_use]
    pub fn into_market(self) -> Option<OpinionMarket> {
        match self.result? {
            ResultBody::Wrapped { data } | ResultBody::Bare(data) => Some(data),
        }
        .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResultBody {
    Wrapped { data: OpinionMarket },
    Bare(OpinionMarket),
}

/// A binary market or a categorical parent with its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpinionMarket {
    #[serde(default, deserialize_with = "string_or_number")]
    pub market_id: Option<String>,
    #[serde(default)]
    pub market_title: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub yes_token_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub no_token_id: Option<String>,
    #[serde(default)]
    pub child_markets: Vec<OpinionMarket>,
}

impl OpinionMarket {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.market_id.is_none()
            && self.market_title.is_none()
            && self.yes_token_id.is_none()
            && self.no_token_id.is_none()
            && self.child_markets.is_empty()
    }
}
