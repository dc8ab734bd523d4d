//! Judgment memoization and its structured trace events.

mod judgment;
pub(crate) mod query_trace;

pub use judgment::{JudgmentCache, JudgmentCacheStats, JudgmentKey, JudgmentKind};
