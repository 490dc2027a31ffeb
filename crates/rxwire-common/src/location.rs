//! Caller location tracking.
//!
//! Generated dispatch functions branch on the call-site's file and position,
//! so locations are part of every descriptor's identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// File/line/column of a call-site, as reported by the host compilation.
///
/// Ordering is lexicographic on (file, line, column); the emitter relies on
/// this to keep else-if dispatch chains in a deterministic order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallerLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl CallerLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        CallerLocation {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for CallerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let a = CallerLocation::new("a.rs", 10, 1);
        let b = CallerLocation::new("a.rs", 10, 5);
        let c = CallerLocation::new("b.rs", 1, 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_location_display() {
        let loc = CallerLocation::new("src/view.rs", 42, 9);
        assert_eq!(loc.to_string(), "src/view.rs:42:9");
    }
}
