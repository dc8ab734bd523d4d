//! Recursion guard for judgments and value conformance.
//!
//! Compatibility judgments and object-type conformance checks both recurse
//! over graphs that may contain cycles: a self-referential object type, two
//! distinct descriptors forming isomorphic cycles, or a value that contains
//! itself. [`RecursionGuard`] combines:
//!
//! 1. **Cycle detection** via a visiting set of in-progress keys
//! 2. **Depth limiting** to keep the native stack bounded
//! 3. **Iteration bounding** as a total work budget per top-level query
//!
//! A cycle is reported as [`RecursionResult::Cycle`]; callers treat the pair
//! as holding (coinductive semantics). Exceeded budgets are reported
//! separately so callers can fail instead of guessing.
//!
//! The default profiles do not cap total work: the judgment cache and the
//! visiting set already bound it by the size of the graphs involved. Their
//! depth limits only stop runaway nesting; guarded computations run under
//! `grow_stack`, so deep acyclic inputs do not exhaust the native stack.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Headroom below which [`grow_stack`] switches to a fresh stack segment.
const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated by [`grow_stack`].
const STACK_SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, moving to a heap-allocated stack segment first when the
/// remaining native stack is low.
#[inline]
pub(crate) fn grow_stack<T>(f: impl FnOnce() -> T) -> T {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, f)
}

/// Named limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Descriptor-versus-descriptor judgments.
    ///
    /// depth = 10,000, iterations = unbounded
    SubtypeCheck,

    /// Value-versus-descriptor conformance. Values nest far deeper than
    /// descriptors (a linked list is one level per node).
    ///
    /// depth = 1,000,000, iterations = unbounded
    ValueConformance,

    /// Explicit limits for tests and embedders.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    /// Iteration budget that is never exhausted.
    pub const UNBOUNDED: u32 = u32::MAX;

    pub const fn max_depth(self) -> u32 {
        match self {
            Self::SubtypeCheck => 10_000,
            Self::ValueConformance => 1_000_000,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::SubtypeCheck | Self::ValueConformance => Self::UNBOUNDED,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Result of attempting to enter a guarded computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already in progress.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

/// Tracks in-progress keys, nesting depth and total work.
///
/// Every successful [`enter`](Self::enter) must be paired with exactly one
/// [`leave`](Self::leave) for the same key, including on error paths. In
/// debug builds a guard dropped with keys still in progress panics.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter the computation for `key`.
    ///
    /// Budgets are checked before the visiting set, so an exhausted guard
    /// reports exhaustion even for a key that is already in progress.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called for a key that is not in progress"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `f` between `enter(key)` and `leave(key)`.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce() -> T) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let result = f();
                self.leave(key);
                Ok(result)
            }
            denied => Err(denied),
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// `true` while any key is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    /// Start a new top-level query: forget all state, keep the limits.
    pub fn reset(&mut self) {
        self.visiting.clear();
        self.depth = 0;
        self.iterations = 0;
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} keys still in progress",
                self.visiting.len()
            );
        }
    }
}
