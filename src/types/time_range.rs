//! Half-open time ranges and the interval predicates built on them.
//!
//! A [`TimeRange`] is `[start, end)`: the start instant is included, the end
//! instant is not. Two ranges that merely touch at a boundary do not
//! overlap, so a duty ending at 10:00 never conflicts with one starting at
//! 10:00.
//!
//! The `start < end` invariant is enforced at construction (and through
//! serde), which keeps [`TimeRange::overlaps`] and [`TimeRange::contains`]
//! total functions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error raised when a range would have `start >= end`.
///
/// A malformed range is a caller bug, not a recoverable condition; it is
/// reported at the earliest point it can be detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time range: start {start} is not before end {end}")]
pub struct InvalidRangeError {
    /// Requested start instant.
    pub start: DateTime<Utc>,
    /// Requested end instant.
    pub end: DateTime<Utc>,
}

/// A half-open time range `[start, end)`.
///
/// Invariant: `start < end`. Construct via [`TimeRange::new`]; the fields
/// are private so the invariant survives every code path, including
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange", into = "RawTimeRange")]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Wire shape for [`TimeRange`]; re-validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawTimeRange {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = InvalidRangeError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.start_time, raw.end_time)
    }
}

impl From<TimeRange> for RawTimeRange {
    fn from(range: TimeRange) -> Self {
        Self {
            start_time: range.start,
            end_time: range.end,
        }
    }
}

impl TimeRange {
    /// Create a new range, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidRangeError> {
        if start >= end {
            return Err(InvalidRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start instant (inclusive).
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End instant (exclusive).
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the range.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether two ranges overlap.
    ///
    /// True iff `self.start < other.end && other.start < self.end`.
    /// Touching ranges do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `inner` lies entirely within this range.
    ///
    /// True iff `self.start <= inner.start && inner.end <= self.end`.
    pub fn contains(&self, inner: &Self) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }

    /// Whether a single instant falls within this range.
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
