//! Removal of entries and child outcomes whose resolution time has passed.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use super::entry::{Entry, EntryBody};
use super::id::MarketId;
use super::market::MarketKind;

/// Which child list of a categorical entry an outcome was removed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildList {
    Pairs,
    UnmatchedMarket,
}

impl fmt::Display for ChildList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pairs => write!(f, "pairs"),
            Self::UnmatchedMarket => write!(f, "unmatched_market"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    /// Latest end date at any level is past the grace window.
    Expired,
    /// Categorical entry with no pairs left whose event is also expired.
    NoActivePairs,
}

impl fmt::Display for PruneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            Self::NoActivePairs => write!(f, "no active pairs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEntry {
    pub name: String,
    pub kind: MarketKind,
    pub slug: String,
    pub latest_end: Option<DateTime<Utc>>,
    pub reason: PruneReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedChild {
    pub parent: String,
    pub list: ChildList,
    pub market_id: MarketId,
    pub candidate: String,
    pub end_date: Option<DateTime<Utc>>,
}

/// Result of a pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub kept: Vec<Entry>,
    pub removed_entries: Vec<RemovedEntry>,
    pub removed_children: Vec<RemovedChild>,
}

impl PruneReport {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.removed_entries.is_empty() && self.removed_children.is_empty()
    }
}

fn is_expired(ts: Option<DateTime<Utc>>, now: DateTime<Utc>, grace: Duration) -> bool {
    ts.is_some_and(|ts| ts + grace < now)
}

/// Drop expired child outcomes, then drop entries whose latest end date is
/// expired. Items and entries with no end date are always kept.
#[must_use]
pub fn prune_expired(entries: Vec<Entry>, now: DateTime<Utc>, grace: Duration) -> PruneReport {
    let mut report = PruneReport::default();

    for mut entry in entries {
        if let EntryBody::Categorical(cat) = &mut entry.body {
            let parent = entry.name.clone();

            cat.pairs.retain(|pair| {
                let expired = is_expired(pair.end_date(), now, grace);
                if expired {
                    report.removed_children.push(RemovedChild {
                        parent: parent.clone(),
                        list: ChildList::Pairs,
                        market_id: pair.market.market_id.clone(),
                        candidate: pair.candidate.clone(),
                        end_date: pair.end_date(),
                    });
                }
                !expired
            });

            cat.unmatched_market.retain(|outcome| {
                let expired = is_expired(outcome.end_date, now, grace);
                if expired {
                    report.removed_children.push(RemovedChild {
                        parent: parent.clone(),
                        list: ChildList::UnmatchedMarket,
                        market_id: outcome.market_id.clone(),
                        candidate: outcome.candidate.clone(),
                        end_date: outcome.end_date,
                    });
                }
                !expired
            });
        }

        let latest = entry.latest_end_date();
        if is_expired(latest, now, grace) {
            let reason = match &entry.body {
                EntryBody::Categorical(cat) if cat.pairs.is_empty() => PruneReason::NoActivePairs,
                _ => PruneReason::Expired,
            };
            report.removed_entries.push(RemovedEntry {
                name: entry.name.clone(),
                kind: entry.kind(),
                slug: entry.slug().to_string(),
                latest_end: latest,
                reason,
            });
            continue;
        }

        report.kept.push(entry);
    }

    report
}
