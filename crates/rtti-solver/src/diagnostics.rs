//! Engine failures and the violation notification sink.
//!
//! Three families of failure are kept apart:
//!
//! 1. **Violations**: a value or call does not conform. The sink is notified
//!    before the error is returned.
//! 2. **Unsupported constructs**: type parameters and intersection sources
//!    against object targets. These are engine limitations, not type errors.
//! 3. **Internal failures**: malformed descriptors, exhausted recursion
//!    budgets, calling a non-function, or an error raised by a function body.

use rtti_common::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Receives `(message, location)` for every violation before it is raised.
///
/// The default sink does nothing. An editor host replaces it to show inline
/// diagnostics instead of only seeing the failure.
pub type ErrorSink = Box<dyn FnMut(&str, &SourceLocation) + Send>;

/// A value or call that failed its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeViolation {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for TypeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_unknown() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} {}", self.location, self.message)
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("{0}")]
    Violation(TypeViolation),

    #[error("unsupported: generic type parameters cannot be checked at run time")]
    UnsupportedTypeParameter,

    #[error("unsupported: intersection source types cannot be related to object types")]
    UnsupportedIntersectionSource,

    #[error("malformed type descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("recursion limit exceeded while {0}")]
    RecursionLimit(&'static str),

    #[error("value is not callable: {0}")]
    NotCallable(String),

    #[error("{0}")]
    Thrown(String),
}

impl EngineError {
    #[inline]
    pub fn is_violation(&self) -> bool {
        matches!(self, EngineError::Violation(_))
    }

    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            EngineError::UnsupportedTypeParameter | EngineError::UnsupportedIntersectionSource
        )
    }

    pub fn violation(&self) -> Option<&TypeViolation> {
        match self {
            EngineError::Violation(violation) => Some(violation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_prefixes_known_location() {
        let err = EngineError::Violation(TypeViolation {
            message: "bad".to_string(),
            location: SourceLocation::new("a.ts", 1, 2),
        });
        assert_eq!(err.to_string(), "a.ts:1:2 bad");
        assert!(err.is_violation());
        assert!(!err.is_unsupported());
    }

    #[test]
    fn violation_display_without_location() {
        let err = EngineError::Violation(TypeViolation {
            message: "bad".to_string(),
            location: SourceLocation::unknown(),
        });
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn unsupported_is_not_a_violation() {
        assert!(EngineError::UnsupportedTypeParameter.is_unsupported());
        assert!(EngineError::UnsupportedIntersectionSource.is_unsupported());
        assert!(!EngineError::UnsupportedTypeParameter.is_violation());
        assert!(EngineError::UnsupportedTypeParameter.violation().is_none());
    }
}
