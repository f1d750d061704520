//! Source positions and ranges
//!
//! Positions are line/column pairs, 1-based. A zeroed position is the
//! "unknown" position and is never considered valid.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A point in source text
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[display("{line}:{column}")]
pub struct Location {
    /// 1-based line, 0 when unknown
    pub line: u32,
    /// 1-based column, 0 when unknown
    pub column: u32,
}

impl Location {
    /// The unknown location
    pub const INVALID: Self = Self { line: 0, column: 0 };

    /// Creates a location from a line and column
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Whether this location points into real source text
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.line != 0 && self.column != 0
    }
}

/// Error raised when a span would end before it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("span finish {finish} precedes start {start}")]
pub struct SpanError {
    /// Requested start
    pub start: Location,
    /// Requested finish
    pub finish: Location,
}

/// A range of source text
///
/// `finish` is the first position beyond the construct.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    start: Location,
    finish: Option<Location>,
}

impl Span {
    /// Creates a span covering `start..finish`
    ///
    /// # Errors
    ///
    /// Returns `SpanError` when both ends are valid and `finish < start`.
    pub fn new(start: Location, finish: Location) -> Result<Self, SpanError> {
        if start.is_valid() && finish.is_valid() && finish < start {
            return Err(SpanError { start, finish });
        }
        Ok(Self {
            start,
            finish: Some(finish),
        })
    }

    /// Creates a span with a start but no known finish
    #[must_use]
    pub const fn at(start: Location) -> Self {
        Self {
            start,
            finish: None,
        }
    }

    /// Start position
    #[must_use]
    pub const fn start(&self) -> Location {
        self.start
    }

    /// First position beyond the construct, if known
    #[must_use]
    pub const fn finish(&self) -> Option<Location> {
        self.finish
    }

    /// Whether the start position is valid
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.start.is_valid()
    }

    /// Whether `location` lies inside this span
    #[must_use]
    pub fn contains(&self, location: Location) -> bool {
        match self.finish {
            Some(finish) if finish.is_valid() => self.start <= location && location < finish,
            _ => self.start <= location,
        }
    }

    /// Smallest span covering both `self` and `other`
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let start = if other.start.is_valid() && (!self.start.is_valid() || other.start < self.start)
        {
            other.start
        } else {
            self.start
        };
        let finish = match (self.finish, other.finish) {
            (Some(left), Some(right)) => Some(left.max(right)),
            (left, right) => left.or(right),
        };
        Self { start, finish }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.finish {
            Some(finish) => write!(formatter, "{}-{finish}", self.start),
            None => write!(formatter, "{}", self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_validity() {
        assert!(!Location::INVALID.is_valid());
        assert!(!Location::new(3, 0).is_valid());
        assert!(Location::new(1, 1).is_valid());
    }

    #[test]
    fn test_span_rejects_backwards_range() {
        let err = Span::new(Location::new(4, 2), Location::new(3, 9)).unwrap_err();
        assert_eq!(err.start, Location::new(4, 2));
        assert_eq!(err.to_string(), "span finish 3:9 precedes start 4:2");
    }

    #[test]
    fn test_span_allows_unknown_finish() {
        let span = Span::new(Location::new(4, 2), Location::INVALID).unwrap();
        assert_eq!(span.finish(), Some(Location::INVALID));
        assert!(span.contains(Location::new(10, 1)));
    }

    #[test]
    fn test_span_contains_is_half_open() {
        let span = Span::new(Location::new(1, 1), Location::new(1, 5)).unwrap();
        assert!(span.contains(Location::new(1, 4)));
        assert!(!span.contains(Location::new(1, 5)));
    }

    #[test]
    fn test_span_merge() {
        let left = Span::new(Location::new(2, 1), Location::new(2, 8)).unwrap();
        let right = Span::new(Location::new(1, 4), Location::new(1, 9)).unwrap();
        let merged = left.merge(&right);
        assert_eq!(merged.start(), Location::new(1, 4));
        assert_eq!(merged.finish(), Some(Location::new(2, 8)));
    }
}
