//! Platform-agnostic domain logic.
//!
//! Everything here is pure: identifiers, configured markets, raw outcomes,
//! persisted entries, and the algorithms that turn two outcome lists into
//! matched pairs (fingerprinting, matching, expiry pruning).

pub mod entry;
pub mod expiry;
pub mod fingerprint;
pub mod id;
pub mod market;
pub mod matcher;
pub mod outcome;

pub use entry::{
    BinaryEntry, BinaryMarketSide, BinaryRegistrySide, CategoricalEntry, Entry, EntryBody,
    MarketLeg, MatchedPair, RegistryLeg, SCHEMA_VERSION,
};
pub use expiry::{prune_expired, ChildList, PruneReason, PruneReport, RemovedChild, RemovedEntry};
pub use fingerprint::FingerprintSet;
pub use id::{MarketId, TokenId};
pub use market::{CacheKey, MarketConfig, MarketKind};
pub use matcher::{match_outcomes, MatchOutcome};
pub use outcome::{RawOutcome, TokenPair};
