//! The engine context.
//!
//! `TypeEngine` owns everything that would otherwise be process-global
//! mutable state: the judgment cache, the recursion guards and the violation
//! sink. Hosts create one engine per worker; descriptor identities are
//! process-wide, so descriptors can be shared between engines.

use crate::caches::{JudgmentCache, JudgmentCacheStats, JudgmentKey, query_trace};
use crate::diagnostics::{EngineError, ErrorSink, TypeViolation};
use crate::format::{TypeFormatter, ValueFormatter};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult, grow_stack};
use crate::types::{DescriptorId, Type};
use crate::value::Value;
use rtti_common::SourceLocation;
use tracing::{trace, warn};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// When set, only `any` is accepted as a universal source; `void` and
    /// `null` sources go through the ordinary target dispatch.
    pub strict_nullable_sources: bool,
    pub subtype_profile: RecursionProfile,
    pub value_profile: RecursionProfile,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict_nullable_sources: false,
            subtype_profile: RecursionProfile::SubtypeCheck,
            value_profile: RecursionProfile::ValueConformance,
        }
    }
}

impl EngineOptions {
    pub fn with_strict_nullable_sources(mut self, strict: bool) -> Self {
        self.strict_nullable_sources = strict;
        self
    }

    pub fn with_subtype_profile(mut self, profile: RecursionProfile) -> Self {
        self.subtype_profile = profile;
        self
    }

    pub fn with_value_profile(mut self, profile: RecursionProfile) -> Self {
        self.value_profile = profile;
        self
    }
}

pub struct TypeEngine {
    pub(crate) options: EngineOptions,
    pub(crate) cache: JudgmentCache,
    pub(crate) subtype_guard: RecursionGuard<JudgmentKey>,
    pub(crate) value_guard: RecursionGuard<(usize, DescriptorId)>,
    sink: ErrorSink,
    /// Judgments computed from scratch (cache misses that ran the algorithm).
    uncached_judgments: u64,
    /// In-progress pairs assumed to hold.
    pub(crate) cycle_assumptions: u64,
}

impl TypeEngine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            cache: JudgmentCache::new(),
            subtype_guard: RecursionGuard::with_profile(options.subtype_profile),
            value_guard: RecursionGuard::with_profile(options.value_profile),
            sink: Box::new(|_, _| {}),
            uncached_judgments: 0,
            cycle_assumptions: 0,
        }
    }

    #[inline]
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Replace the violation sink.
    pub fn set_error_sink(&mut self, sink: impl FnMut(&str, &SourceLocation) + Send + 'static) {
        self.sink = Box::new(sink);
    }

    /// Restore the default no-op sink.
    pub fn clear_error_sink(&mut self) {
        self.sink = Box::new(|_, _| {});
    }

    pub fn cache_stats(&self) -> JudgmentCacheStats {
        self.cache.stats()
    }

    /// Number of judgments that ran the uncached algorithm.
    #[inline]
    pub fn uncached_judgments(&self) -> u64 {
        self.uncached_judgments
    }

    /// Drop all per-context state for an independent run. Identities already
    /// assigned to descriptors are kept.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.subtype_guard.reset();
        self.value_guard.reset();
        self.uncached_judgments = 0;
        self.cycle_assumptions = 0;
    }

    /// Assertion entry point inlined by the compiler at cast and `any`-escape
    /// sites. Returns `value` unchanged when it conforms.
    pub fn assert_type(
        &mut self,
        value: Value,
        ty: &Type,
        location: SourceLocation,
    ) -> Result<Value, EngineError> {
        if self.is_type(&value, ty)? {
            return Ok(value);
        }
        let message = format!(
            "Value:\n{}\nis not assignable to type:\n{}",
            ValueFormatter::new().format(&value),
            TypeFormatter::new().format(ty)
        );
        Err(self.report_violation(message, location))
    }

    /// Notify the sink and build the violation error to raise.
    pub(crate) fn report_violation(
        &mut self,
        message: String,
        location: SourceLocation,
    ) -> EngineError {
        warn!(location = %location, "type violation");
        (self.sink)(&message, &location);
        EngineError::Violation(TypeViolation { message, location })
    }

    /// Run a memoized judgment.
    ///
    /// Lookup order: cache, then the recursion guard, then `compute`. A pair
    /// that is already in progress is assumed to hold. Results that relied
    /// on such an assumption are only cached when they are negative or when
    /// the outermost judgment finishes, so a provisional `true` never leaks
    /// into the cache.
    pub(crate) fn judge(
        &mut self,
        key: JudgmentKey,
        compute: impl FnOnce(&mut Self) -> Result<bool, EngineError>,
    ) -> Result<bool, EngineError> {
        let tracing = query_trace::enabled();
        let query_id = if tracing {
            let id = query_trace::next_query_id();
            query_trace::judgment_start(id, &key);
            id
        } else {
            0
        };

        if let Some(cached) = self.cache.lookup(&key) {
            if tracing {
                query_trace::judgment_end(query_id, &key, cached, true);
            }
            return Ok(cached);
        }

        if !self.subtype_guard.is_active() {
            self.subtype_guard.reset();
        }

        match self.subtype_guard.enter(key) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                self.cycle_assumptions += 1;
                if tracing {
                    query_trace::cycle_assumed(&key);
                }
                return Ok(true);
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                return Err(EngineError::RecursionLimit("relating type descriptors"));
            }
        }

        let assumptions_before = self.cycle_assumptions;
        self.uncached_judgments += 1;
        let result = grow_stack(|| compute(self));
        self.subtype_guard.leave(key);
        let result = result?;

        let outermost = !self.subtype_guard.is_active();
        if !result || outermost || self.cycle_assumptions == assumptions_before {
            self.cache.insert(key, result);
        } else {
            trace!(?key, "judgment depends on an in-progress pair; not cached");
        }

        if tracing {
            query_trace::judgment_end(query_id, &key, result, false);
        }
        Ok(result)
    }
}

impl Default for TypeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/engine_tests.rs"]
mod tests;
