//! Short candidate labels for Gamma child markets.
//!
//! Event children usually carry a `groupItemTitle` ("Arsenal", "25 bps
//! decrease"). When they don't, a label is recovered from the question.

use std::sync::LazyLock;

use regex::Regex;

use super::response::GammaMarket;

static RE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']+)'").unwrap());
static RE_ANOTHER_GAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\banother\b.*\bgame\b").unwrap());
static RE_DECREASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdecreases?\b|\bcuts?\b").unwrap());
static RE_INCREASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bincreases?\b|\bhikes?\b").unwrap());
static RE_BPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)by\s+(\d+\+?)\s*bps").unwrap());
static RE_NO_CHANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bno\s+change\b|\bunchanged\b|\bkeeps?\b").unwrap());
static RE_CLOSE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)close\s+at\s+\$?([0-9][0-9,]*)\s*(?:–|-|to)\s*\$?([0-9][0-9,]*)").unwrap()
});
static RE_CLOSE_BELOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)close\s+(?:below|at\s+<)\s*\$?([0-9][0-9,]*)").unwrap()
});
static RE_CLOSE_ABOVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)close\s+(?:above|at\s+>)\s*\$?([0-9][0-9,]*)").unwrap()
});
static RE_REACH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:reach|hit)\s+(\$?)([0-9][0-9,]*)").unwrap());
static RE_DIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)dip\s+to\s+\$?([0-9][0-9,]*)").unwrap());

/// Label for a child market: its group title, else one derived from the
/// question.
#[must_use]
pub fn candidate_label(market: &GammaMarket) -> String {
    if let Some(title) = market.group_item_title() {
        return title.to_string();
    }
    from_question(market.question.as_deref().unwrap_or_default())
}

/// Recover a short label from a market question.
///
/// Tried in order: a single-quoted name, "another ... game", a rate
/// decrease/increase (with basis points when given), no change, a closing
/// price range, a closing price bound, a reach/hit target, a dip target.
/// Falls back to the question itself.
#[must_use]
pub fn from_question(question: &str) -> String {
    let q = question.trim();

    if let Some(caps) = RE_QUOTED.captures(q) {
        return caps[1].trim().to_string();
    }
    if RE_ANOTHER_GAME.is_match(q) {
        return "Another game".into();
    }

    let bps = RE_BPS.captures(q).map(|caps| caps[1].to_string());
    if RE_DECREASE.is_match(q) {
        return bps.map_or_else(|| "Decrease".into(), |b| format!("{b} bps decrease"));
    }
    if RE_INCREASE.is_match(q) {
        return bps.map_or_else(|| "Increase".into(), |b| format!("{b} bps increase"));
    }
    if RE_NO_CHANGE.is_match(q) {
        return "No change".into();
    }

    if let Some(caps) = RE_CLOSE_RANGE.captures(q) {
        return format!("${}–{}", caps[1].replace(',', ""), caps[2].replace(',', ""));
    }
    if let Some(caps) = RE_CLOSE_BELOW.captures(q) {
        return format!("<${}", &caps[1]);
    }
    if let Some(caps) = RE_CLOSE_ABOVE.captures(q) {
        return format!(">${}", &caps[1]);
    }

    if let Some(caps) = RE_REACH.captures(q) {
        return if caps[1].is_empty() {
            format!("↑ {}", &caps[2])
        } else {
            format!("↑${}", &caps[2])
        };
    }
    if let Some(caps) = RE_DIP.captures(q) {
        return format!("↓ {}", &caps[1]);
    }

    q.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_title_wins() {
        let market = GammaMarket {
            group_item_title: Some("Arsenal".into()),
            question: Some("Will 'Chelsea' win?".into()),
            ..GammaMarket::default()
        };
        assert_eq!(candidate_label(&market), "Arsenal");
    }

    #[test]
    fn quoted_name() {
        assert_eq!(
            from_question("Will 'Hollow Knight: Silksong' win Game of the Year?"),
            "Hollow Knight: Silksong"
        );
    }

    #[test]
    fn another_game() {
        assert_eq!(
            from_question("Will another game win Game of the Year?"),
            "Another game"
        );
    }

    #[test]
    fn rate_moves() {
        assert_eq!(
            from_question("Fed decreases interest rates by 25 bps after January 2026 meeting?"),
            "25 bps decrease"
        );
        assert_eq!(
            from_question("Fed increases interest rates by 50+ bps?"),
            "50+ bps increase"
        );
        assert_eq!(from_question("Will the ECB cut rates?"), "Decrease");
        assert_eq!(from_question("No change in Fed interest rates?"), "No change");
    }

    #[test]
    fn closing_prices() {
        assert_eq!(
            from_question("Will NVDA close at $280-295 on Friday?"),
            "$280–295"
        );
        assert_eq!(from_question("Will ETH close below $4,000?"), "<$4,000");
        assert_eq!(from_question("Will ETH close above 500?"), ">$500");
        assert_eq!(from_question("Will SOL close at <$150?"), "<$150");
    }

    #[test]
    fn price_targets() {
        assert_eq!(
            from_question("Will Bitcoin reach 105,000 in December?"),
            "↑ 105,000"
        );
        assert_eq!(from_question("Will ETH hit $5,000 by March?"), "↑$5,000");
        assert_eq!(from_question("Will Bitcoin dip to 80,000?"), "↓ 80,000");
    }

    #[test]
    fn falls_back_to_question() {
        assert_eq!(from_question("  Who will win?  "), "Who will win?");
        assert_eq!(from_question(""), "");
    }
}
