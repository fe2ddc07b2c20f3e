//! Greedy cross-platform outcome matching.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use super::entry::{MarketLeg, MatchedPair, RegistryLeg};
use super::fingerprint::{normalize, FingerprintSet};
use super::outcome::{RawOutcome, TokenPair};

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:game|movie|team|option|candidate|player|item)\s+[a-z]$").unwrap()
});

/// Generic labels such as "Game C" or "Another game" that never correspond
/// to a real outcome on the other platform.
#[must_use]
pub fn is_placeholder(label: &str) -> bool {
    let label = label.trim();
    RE_PLACEHOLDER.is_match(label) || label.to_lowercase().contains("another game")
}

/// Pairs and leftovers of one matching pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub pairs: Vec<MatchedPair>,
    pub unmatched_registry: Vec<RawOutcome>,
    pub unmatched_market: Vec<RawOutcome>,
}

/// An outcome annotated for matching.
struct Candidate<'a> {
    outcome: &'a RawOutcome,
    tokens: TokenPair,
    norm: String,
    keys: FingerprintSet,
}

impl<'a> Candidate<'a> {
    fn registry(outcome: &'a RawOutcome) -> Option<Self> {
        let tokens = outcome.tokens()?;
        Some(Self {
            outcome,
            tokens,
            norm: normalize(&outcome.candidate),
            keys: FingerprintSet::from_text(&outcome.candidate, None),
        })
    }

    fn market(outcome: &'a RawOutcome) -> Option<Self> {
        let tokens = outcome.tokens()?;
        Some(Self {
            outcome,
            tokens,
            norm: normalize(&outcome.candidate),
            keys: FingerprintSet::from_text(&outcome.candidate, outcome.question.as_deref()),
        })
    }
}

/// Match registry outcomes against market outcomes.
///
/// Each registry outcome, in order, takes the unused market outcome with the
/// highest fingerprint overlap score. Equal scores prefer an exact normalized
/// label match, then the first market outcome seen. `event_end` is used for
/// market outcomes that carry no end date of their own.
#[must_use]
pub fn match_outcomes(
    registry: &[RawOutcome],
    market: &[RawOutcome],
    event_end: Option<DateTime<Utc>>,
) -> MatchOutcome {
    let mut result = MatchOutcome::default();

    let mut pool: Vec<Candidate<'_>> = Vec::with_capacity(market.len());
    for outcome in market {
        if is_placeholder(&outcome.candidate) {
            debug!(candidate = %outcome.candidate, "Skipping placeholder outcome");
            continue;
        }
        match Candidate::market(outcome) {
            Some(c) => pool.push(c),
            None => result
                .unmatched_market
                .push(with_effective_end(outcome, event_end)),
        }
    }
    let mut used = vec![false; pool.len()];

    for outcome in registry {
        let Some(a) = Candidate::registry(outcome) else {
            result.unmatched_registry.push(outcome.clone());
            continue;
        };

        let mut best: Option<(usize, u32)> = None;
        for (idx, b) in pool.iter().enumerate() {
            if used[idx] {
                continue;
            }
            let score = a.keys.overlap_score(&b.keys);
            if score == 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_idx, best_score)) => {
                    score > best_score
                        || (score == best_score
                            && b.norm == a.norm
                            && pool[best_idx].norm != a.norm)
                }
            };
            if better {
                best = Some((idx, score));
            }
        }

        match best {
            Some((idx, score)) => {
                used[idx] = true;
                let b = &pool[idx];
                debug!(
                    registry = %a.outcome.candidate,
                    market = %b.outcome.candidate,
                    score,
                    "Matched outcome"
                );
                result.pairs.push(pair(&a, b, event_end));
            }
            None => result.unmatched_registry.push(outcome.clone()),
        }
    }

    for (idx, b) in pool.iter().enumerate() {
        if !used[idx] {
            result
                .unmatched_market
                .push(with_effective_end(b.outcome, event_end));
        }
    }

    result
}

fn pair(a: &Candidate<'_>, b: &Candidate<'_>, event_end: Option<DateTime<Utc>>) -> MatchedPair {
    MatchedPair {
        candidate: a.outcome.candidate.clone(),
        registry: RegistryLeg {
            market_id: a.outcome.market_id.clone(),
            tokens: a.tokens.clone(),
        },
        market: MarketLeg {
            market_id: b.outcome.market_id.clone(),
            candidate: b.outcome.candidate.clone(),
            question: b.outcome.question.clone().unwrap_or_default(),
            tokens: b.tokens.clone(),
            end_date: b.outcome.end_date.or(event_end),
        },
    }
}

fn with_effective_end(outcome: &RawOutcome, event_end: Option<DateTime<Utc>>) -> RawOutcome {
    let end = outcome.end_date.or(event_end);
    outcome.clone().with_end_date(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn a(id: &str, label: &str) -> RawOutcome {
        RawOutcome::new(id, label).with_tokens(format!("a{id}-y"), format!("a{id}-n"))
    }

    fn b(id: &str, label: &str) -> RawOutcome {
        RawOutcome::new(id, label).with_tokens(format!("b{id}-y"), format!("b{id}-n"))
    }

    fn labels(pairs: &[MatchedPair]) -> Vec<(&str, &str)> {
        pairs
            .iter()
            .map(|p| (p.candidate.as_str(), p.market.candidate.as_str()))
            .collect()
    }

    // ---- Placeholders ----

    #[test]
    fn placeholder_patterns() {
        assert!(is_placeholder("Game C"));
        assert!(is_placeholder("movie d"));
        assert!(is_placeholder(" Player X "));
        assert!(is_placeholder("Another game"));
        assert!(is_placeholder("Will another game win?"));
        assert!(!is_placeholder("Game of Thrones"));
        assert!(!is_placeholder("Team Liquid"));
        assert!(!is_placeholder("Arsenal"));
    }

    // ---- Matching ----

    #[test]
    fn rate_decision_outcomes_pair_up() {
        let registry = vec![a("1", "Decrease"), a("2", "Increase"), a("3", "No change")];
        let market = vec![
            b("10", "25 bps decrease"),
            b("11", "25 bps increase"),
            b("12", "Fed holds rates"),
        ];

        let out = match_outcomes(&registry, &market, None);

        assert_eq!(
            labels(&out.pairs),
            vec![
                ("Decrease", "25 bps decrease"),
                ("Increase", "25 bps increase"),
                ("No change", "Fed holds rates"),
            ]
        );
        assert!(out.unmatched_registry.is_empty());
        assert!(out.unmatched_market.is_empty());
    }

    #[test]
    fn equal_scores_keep_first_seen_when_labels_differ() {
        let registry = vec![a("1", "↑105,000")];
        let market = vec![
            b("10", "Bitcoin reaches 105000"),
            b("11", "Ethereum reaches 105000"),
        ];

        let out = match_outcomes(&registry, &market, None);

        assert_eq!(labels(&out.pairs), vec![("↑105,000", "Bitcoin reaches 105000")]);
        assert_eq!(out.unmatched_market.len(), 1);
        assert_eq!(out.unmatched_market[0].candidate, "Ethereum reaches 105000");
    }

    #[test]
    fn equal_scores_prefer_identical_label() {
        let registry = vec![a("1", "Arsenal")];
        let market = vec![
            b("10", "Arsenal FC").with_question("Arsenal"),
            b("11", "arsenal"),
        ];

        let out = match_outcomes(&registry, &market, None);

        // "arsenal" scores 1 on both; the exact label wins the tie.
        assert_eq!(labels(&out.pairs), vec![("Arsenal", "arsenal")]);
    }

    #[test]
    fn numeric_range_matches_across_formats() {
        let registry = vec![a("1", "$280–295")];
        let market = vec![b("10", "280 or more"), b("11", "Between 280-295")];

        let out = match_outcomes(&registry, &market, None);

        assert_eq!(labels(&out.pairs), vec![("$280–295", "Between 280-295")]);
    }

    #[test]
    fn market_outcome_is_never_used_twice() {
        let registry = vec![a("1", "Decrease"), a("2", "Decrease rates")];
        let market = vec![b("10", "25 bps decrease")];

        let out = match_outcomes(&registry, &market, None);

        assert_eq!(out.pairs.len(), 1);
        assert_eq!(out.pairs[0].candidate, "Decrease");
        assert_eq!(out.unmatched_registry.len(), 1);
        assert_eq!(out.unmatched_registry[0].candidate, "Decrease rates");
    }

    #[test]
    fn no_overlap_leaves_both_sides_unmatched() {
        let out = match_outcomes(&[a("1", "Arsenal")], &[b("10", "Chelsea")], None);
        assert!(out.pairs.is_empty());
        assert_eq!(out.unmatched_registry.len(), 1);
        assert_eq!(out.unmatched_market.len(), 1);
    }

    #[test]
    fn placeholders_are_dropped_from_market_side() {
        let registry = vec![a("1", "Hollow Knight Silksong")];
        let market = vec![b("10", "Game C"), b("11", "Hollow Knight: Silksong")];

        let out = match_outcomes(&registry, &market, None);

        assert_eq!(out.pairs.len(), 1);
        assert!(out.unmatched_market.is_empty());
    }

    #[test]
    fn outcomes_without_tokens_are_reported_unmatched() {
        let registry = vec![RawOutcome::new("1", "Decrease")];
        let market = vec![RawOutcome::new("10", "25 bps decrease").with_tokens("y", "")];

        let out = match_outcomes(&registry, &market, None);

        assert!(out.pairs.is_empty());
        assert_eq!(out.unmatched_registry.len(), 1);
        assert_eq!(out.unmatched_market.len(), 1);
    }

    #[test]
    fn market_question_contributes_fingerprints() {
        let registry = vec![a("1", "December 15")];
        let market = vec![
            b("10", "Yes").with_question("Will it snow on March 3?"),
            b("11", "Yes").with_question("Will it snow on December 15, 2025?"),
        ];

        let out = match_outcomes(&registry, &market, None);

        assert_eq!(out.pairs.len(), 1);
        assert_eq!(out.pairs[0].market.market_id.as_str(), "11");
        assert_eq!(out.pairs[0].market.question, "Will it snow on December 15, 2025?");
    }

    // ---- End dates ----

    #[test]
    fn pair_end_date_falls_back_to_event() {
        let event_end = Utc.with_ymd_and_hms(2026, 1, 28, 19, 0, 0).unwrap();
        let own_end = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let registry = vec![a("1", "Decrease"), a("2", "Increase")];
        let market = vec![
            b("10", "25 bps decrease").with_end_date(Some(own_end)),
            b("11", "25 bps increase"),
            b("12", "50+ bps decrease"),
        ];

        let out = match_outcomes(&registry, &market, Some(event_end));

        assert_eq!(out.pairs[0].end_date(), Some(own_end));
        assert_eq!(out.pairs[1].end_date(), Some(event_end));
        assert_eq!(out.unmatched_market[0].end_date, Some(event_end));
    }

    #[test]
    fn matching_is_deterministic() {
        let registry = vec![a("1", "Decrease"), a("2", "Increase"), a("3", "No change")];
        let market = vec![
            b("10", "Fed holds rates"),
            b("11", "25 bps increase"),
            b("12", "25 bps decrease"),
        ];
        assert_eq!(
            match_outcomes(&registry, &market, None),
            match_outcomes(&registry, &market, None)
        );
    }
}
