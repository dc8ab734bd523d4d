//! Structured tracing for judgment entry points.
//!
//! Events use target `rtti::judgment_json` and are intended to be consumed with:
//! `RTTI_LOG=rtti::judgment_json=trace RTTI_LOG_FORMAT=json`.
//!
//! Environment:
//! - `RTTI_RUN_ID`: optional run identifier attached to every event.

use super::JudgmentKey;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "rtti::judgment_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| std::env::var("RTTI_RUN_ID").unwrap_or_else(|_| "default".to_string()))
        .as_str()
}

#[inline]
pub(crate) fn judgment_start(query_id: u64, key: &JudgmentKey) {
    trace!(
        target: "rtti::judgment_json",
        event = "judgment",
        phase = "start",
        run_id = run_id(),
        query_id,
        kind = key.kind.as_str(),
        source_id = key.source.0,
        target_id = key.target.0
    );
}

#[inline]
pub(crate) fn judgment_end(query_id: u64, key: &JudgmentKey, result: bool, cache_hit: bool) {
    trace!(
        target: "rtti::judgment_json",
        event = "judgment",
        phase = "end",
        run_id = run_id(),
        query_id,
        kind = key.kind.as_str(),
        result,
        cache_hit
    );
}

#[inline]
pub(crate) fn cycle_assumed(key: &JudgmentKey) {
    trace!(
        target: "rtti::judgment_json",
        event = "cycle",
        run_id = run_id(),
        kind = key.kind.as_str(),
        source_id = key.source.0,
        target_id = key.target.0
    );
}
