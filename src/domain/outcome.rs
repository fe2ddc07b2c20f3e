//! Unresolved outcomes as reported by a single platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MarketId, TokenId};

/// The two opposing trade identifiers of one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub yes_token_id: TokenId,
    pub no_token_id: TokenId,
}

impl TokenPair {
    pub fn new(yes: impl Into<TokenId>, no: impl Into<TokenId>) -> Self {
        Self {
            yes_token_id: yes.into(),
            no_token_id: no.into(),
        }
    }
}

/// One platform's view of a resolvable outcome.
///
/// Produced by an adapter and never mutated afterwards. Either token may be
/// missing upstream; such outcomes are never paired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutcome {
    pub market_id: MarketId,
    /// Short label shown to users ("Decrease", "↑105,000", "Arsenal").
    pub candidate: String,
    /// Full question text, when the platform provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub yes_token_id: Option<TokenId>,
    pub no_token_id: Option<TokenId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl RawOutcome {
    pub fn new(market_id: impl Into<MarketId>, candidate: impl Into<String>) -> Self {
        Self {
            market_id: market_id.into(),
            candidate: candidate.into(),
            question: None,
            yes_token_id: None,
            no_token_id: None,
            end_date: None,
        }
    }

    #[must_use]
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, yes: impl Into<TokenId>, no: impl Into<TokenId>) -> Self {
        self.yes_token_id = Some(yes.into());
        self.no_token_id = Some(no.into());
        self
    }

    #[must_use]
    pub fn with_end_date(mut self, end_date: Option<DateTime<Utc>>) -> Self {
        self.end_date = end_date;
        self
    }

    /// Both trade identifiers, if present and non-blank.
    #[must_use]
    pub fn tokens(&self) -> Option<TokenPair> {
        match (&self.yes_token_id, &self.no_token_id) {
            (Some(yes), Some(no)) if !yes.is_empty() && !no.is_empty() => Some(TokenPair {
                yes_token_id: yes.clone(),
                no_token_id: no.clone(),
            }),
            _ => None,
        }
    }

    /// True when the outcome can take part in matching.
    #[must_use]
    pub fn is_tradeable(&self) -> bool {
        !self.market_id.is_empty() && self.tokens().is_some()
    }
}
