//! Source locations for inlined assertion sites.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of an assertion site in the original (typed) source file.
///
/// Lines and columns are whatever the compiler emitted; the engine never
/// interprets them beyond printing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location used for violations with no assertion site, such as a
    /// rejected call through the interceptor.
    pub fn unknown() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line == 0 && self.column == 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
