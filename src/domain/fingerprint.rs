//! Fingerprint extraction for outcome labels.
//!
//! Turns free-text labels such as `"↑105,000"`, `"25 bps decrease"` or
//! `"December 15, 2025"` into a set of normalized strings that can be
//! compared across platforms. Every stage only adds strings; nothing is
//! removed once collected.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static RE_NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s]+").unwrap());
static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());
static RE_INTEREST_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\binterest\s+rates?\b").unwrap());
static RE_RATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\brates?\b").unwrap());
static RE_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({})\s+(\d{{1,2}})\b", MONTHS.join("|"))).unwrap()
});
static RE_MONTH_DAY_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:{})\s+\d{{1,2}}$", MONTHS.join("|"))).unwrap()
});
static RE_COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*([kmb])\b").unwrap());
static RE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:-|–|to)\s*(\d+)").unwrap());
static RE_SYMBOL_THRESHOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|>|<)\s*\$?\s*(\d+(?:\.\d+)?)").unwrap());
static RE_DOLLAR_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*(\d{2,}(?:\.\d+)?)").unwrap());
static RE_BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2,}(?:\.\d+)?)\b").unwrap());
static RE_UP_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:up|reach|hit|at least|above|over|greater than|more than)\b").unwrap()
});
static RE_DOWN_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:down|dip|below|under|less than|at most)\b").unwrap());
static RE_RATE_MOVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(increase|decrease)s?(?:\s+rates?)?\b").unwrap());
static RE_HOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:holds?|no change|unchanged|nochange)\b").unwrap());
static RE_THRESHOLD_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:ge|gt|le|lt)_\d{2,}$").unwrap());
static RE_NUMBER_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,}$").unwrap());
static RE_RANGE_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2,}-\d{2,}$").unwrap());

/// Comparison direction of a price threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ge,
    Gt,
    Le,
    Lt,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ge => "ge",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Lt => "lt",
        }
    }
}

/// Deterministic set of normalized fingerprints for one outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintSet(BTreeSet<String>);

impl FingerprintSet {
    /// Build the fingerprint set for a label and optional supporting text
    /// (typically the full question).
    #[must_use]
    pub fn from_text(label: &str, extra: Option<&str>) -> Self {
        let mut keys = BTreeSet::new();

        for raw in std::iter::once(label).chain(extra) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            collect_text_keys(raw, &mut keys);
        }

        canonicalize(&mut keys);
        keys.retain(|k| !k.is_empty());
        Self(keys)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of weights over the fingerprints both sets share.
    #[must_use]
    pub fn overlap_score(&self, other: &Self) -> u32 {
        self.0.intersection(&other.0).map(|k| weight(k)).sum()
    }
}

fn collect_text_keys(raw: &str, keys: &mut BTreeSet<String>) {
    let base = normalize(raw);
    let no_comma = normalize(&raw.replace([',', '，'], ""));

    for key in [&base, &no_comma] {
        keys.insert(key.clone());
        keys.insert(strip_years(key));
    }

    let stripped: Vec<String> = keys.iter().map(|k| strip_rate_words(k)).collect();
    keys.extend(stripped);

    if let Some(md) = month_day(raw) {
        keys.insert(md);
    }

    let digits = digits_only(raw);
    if digits.len() >= 3 {
        keys.insert(digits);
    }

    if let Some(n) = expand_compact_number(raw) {
        if n >= 100 {
            keys.insert(n.to_string());
        }
    }

    if let Some(range) = numeric_range(raw) {
        keys.insert(range);
    }

    if let Some((direction, n)) = directional_threshold(raw) {
        keys.insert(format!("{}_{n}", direction.as_str()));
        keys.insert(n.to_string());
    }
}

fn canonicalize(keys: &mut BTreeSet<String>) {
    let mut extra = Vec::new();
    for key in keys.iter() {
        for caps in RE_RATE_MOVE.captures_iter(key) {
            extra.push(caps[1].to_string());
        }
        if RE_HOLD.is_match(key) {
            extra.push("hold".to_string());
            extra.push("no change".to_string());
        }
    }
    keys.extend(extra);

    if keys.contains("another game") || keys.contains("another") {
        keys.insert("other".to_string());
    }
    if keys.contains("other") {
        keys.insert("another game".to_string());
    }
}

/// Lowercase, unify quotes/arrows/dashes, drop punctuation, collapse spaces.
#[must_use]
pub fn normalize(s: &str) -> String {
    let s = s
        .trim()
        .to_lowercase()
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace('\u{2019}', "'");
    let s = s.trim_matches(|c| c == '"' || c == '\'');
    let s = s.replace(['↑', '↓', '→'], " ").replace('–', "-");
    let s = RE_NON_ALNUM.replace_all(&s, " ");
    collapse(&s)
}

fn collapse(s: &str) -> String {
    RE_SPACES.replace_all(s, " ").trim().to_string()
}

fn strip_years(s: &str) -> String {
    collapse(&RE_YEAR.replace_all(s, " "))
}

fn strip_rate_words(s: &str) -> String {
    let s = RE_INTEREST_RATE.replace_all(s, " ");
    let s = RE_RATE.replace_all(&s, " ");
    collapse(&s)
}

fn month_day(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    let caps = RE_MONTH_DAY.captures(&lower)?;
    let day: u32 = caps[2].parse().ok()?;
    Some(format!("{} {day}", &caps[1]))
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn expand_compact_number(raw: &str) -> Option<u64> {
    let t = raw.trim().to_lowercase().replace(['$', ',', '，'], "");
    let caps = RE_COMPACT.captures(&t)?;
    let num: f64 = caps[1].parse().ok()?;
    let multiplier = match &caps[2] {
        "k" => 1_000.0,
        "m" => 1_000_000.0,
        _ => 1_000_000_000.0,
    };
    Some((num * multiplier).round() as u64)
}

fn numeric_range(raw: &str) -> Option<String> {
    let t = raw.replace(',', "");
    let caps = RE_RANGE.captures(&t)?;
    Some(format!("{}-{}", &caps[1], &caps[2]))
}

/// Locate a price threshold and its direction.
///
/// Symbolic comparators win; otherwise the first `$`-prefixed (or bare)
/// number of two or more digits is tagged by direction words or arrows.
#[must_use]
pub fn directional_threshold(raw: &str) -> Option<(Direction, u64)> {
    let t = raw.replace(',', "");

    if let Some(caps) = RE_SYMBOL_THRESHOLD.captures(&t) {
        let n = parse_rounded(&caps[2])?;
        let direction = match &caps[1] {
            ">=" => Direction::Ge,
            "<=" => Direction::Le,
            ">" => Direction::Gt,
            _ => Direction::Lt,
        };
        return Some((direction, n));
    }

    let number = RE_DOLLAR_NUMBER
        .captures(&t)
        .or_else(|| RE_BARE_NUMBER.captures(&t))
        .map(|caps| caps[1].to_string())?;
    let n = parse_rounded(&number)?;

    let lower = t.to_lowercase();
    if raw.contains('↑') || RE_UP_WORDS.is_match(&lower) {
        return Some((Direction::Ge, n));
    }
    if raw.contains('↓') || RE_DOWN_WORDS.is_match(&lower) {
        return Some((Direction::Le, n));
    }
    None
}

fn parse_rounded(s: &str) -> Option<u64> {
    s.parse::<f64>().ok().map(|v| v.round() as u64)
}

/// Specificity weight of a single fingerprint.
#[must_use]
pub fn weight(key: &str) -> u32 {
    let key = key.trim();
    if key.is_empty() {
        return 0;
    }
    if RE_THRESHOLD_KEY.is_match(key) {
        return 12;
    }
    if RE_NUMBER_KEY.is_match(key) {
        return 10;
    }
    if RE_RANGE_KEY.is_match(key) {
        return 9;
    }
    if RE_MONTH_DAY_KEY.is_match(key) {
        return 7;
    }
    match key {
        "increase" | "decrease" | "hold" | "no change" => 3,
        "yes" | "no" => 2,
        _ => 1,
    }
}
