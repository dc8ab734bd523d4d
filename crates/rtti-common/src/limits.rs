//! Centralized limits for the runtime type engine.
//!
//! Recursion limits for judgments and value conformance live in
//! `rtti_solver::recursion::RecursionProfile`; this module only holds the
//! thresholds that are shared outside the solver.

// =============================================================================
// Diagnostic Limits
// =============================================================================

/// Maximum number of array (or typed array) elements rendered in a diagnostic.
///
/// Longer sequences are cut after this many elements and followed by an
/// ellipsis marker, which keeps violation messages bounded for large buffers:
///
/// ```text
/// [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, ...]
/// ```
pub const MAX_ARRAY_PREVIEW_ELEMENTS: usize = 10;

/// Marker printed in place of a value that was already printed earlier in
/// the same diagnostic.
pub const CIRCULAR_REFERENCE_MARKER: &str = "[circular reference]";

/// Marker printed when an unnamed object type refers back to itself.
pub const CIRCULAR_TYPE_MARKER: &str = "[circular type]";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_limit_matches_diagnostic_contract() {
        assert_eq!(MAX_ARRAY_PREVIEW_ELEMENTS, 10);
    }

    #[test]
    fn markers_are_distinct() {
        assert_ne!(CIRCULAR_REFERENCE_MARKER, CIRCULAR_TYPE_MARKER);
    }
}
