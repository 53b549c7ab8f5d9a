//! Boundary reassignment between adjacent duty bindings.
//!
//! When a person is dragged from one duty binding to an adjacent one at a
//! given time boundary, the source binding is truncated to end at the
//! boundary and the target binding is extended to start there. The kernel
//! computes the new ranges; the persistence layer applies them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DutyBinding, RecordId, TimeRange};

/// Whether a reassignment may empty the source binding.
///
/// Explicit parameter rather than a mode held on some long-lived object:
/// the caller decides, per call, whether "source collapses to nothing"
/// means "remove the source binding" or "reject the move".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceCollapse {
    /// The source binding must keep a non-empty range.
    Forbid,
    /// The source binding may collapse; the caller removes it entirely.
    Allow,
}

/// Error raised when a boundary would produce an inverted or forbidden
/// empty range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidBoundaryError {
    /// The boundary lies before the source binding even starts.
    #[error("boundary {boundary} lies before the source range start {source_start}")]
    BeforeSource {
        /// The offending boundary.
        boundary: DateTime<Utc>,
        /// Start of the source binding's range.
        source_start: DateTime<Utc>,
    },
    /// The boundary would leave the target binding empty or inverted.
    #[error("boundary {boundary} is not before the target range end {target_end}")]
    AtOrAfterTargetEnd {
        /// The offending boundary.
        boundary: DateTime<Utc>,
        /// End of the target binding's range.
        target_end: DateTime<Utc>,
    },
    /// The boundary would empty the source binding and policy forbids it.
    #[error("boundary {boundary} would empty the source range and collapse is forbidden")]
    SourceCollapsed {
        /// The offending boundary.
        boundary: DateTime<Utc>,
    },
}

/// The computed outcome of a boundary reassignment.
///
/// Mirrors what the persistence call needs: which binding shrinks to which
/// new range, and which binding grows. `new_source_range` is `None` when
/// the source collapsed (only possible under [`SourceCollapse::Allow`]),
/// meaning the source binding should be removed outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReassignmentDetails {
    /// The binding losing time.
    pub source_binding_id: RecordId,
    /// The source's truncated range, or `None` if it collapsed.
    pub new_source_range: Option<TimeRange>,
    /// The binding gaining time.
    pub target_binding_id: RecordId,
    /// The target's extended range, starting at the boundary.
    pub new_target_range: TimeRange,
}

/// Move the boundary between two adjacent bindings.
///
/// The source's range becomes `[source.start, boundary)` and the target's
/// becomes `[boundary, target.end)`.
///
/// # Errors
///
/// - [`InvalidBoundaryError::BeforeSource`] — the boundary precedes the
///   source range (would invert it)
/// - [`InvalidBoundaryError::AtOrAfterTargetEnd`] — the boundary does not
///   precede the target's end (would invert or empty it; the target always
///   remains non-empty)
/// - [`InvalidBoundaryError::SourceCollapsed`] — the boundary equals the
///   source start while `collapse` is [`SourceCollapse::Forbid`]
pub fn resolve_reassignment(
    source: &DutyBinding,
    target: &DutyBinding,
    boundary: DateTime<Utc>,
    collapse: SourceCollapse,
) -> Result<ReassignmentDetails, InvalidBoundaryError> {
    if boundary < source.range.start() {
        return Err(InvalidBoundaryError::BeforeSource {
            boundary,
            source_start: source.range.start(),
        });
    }
    if boundary >= target.range.end() {
        return Err(InvalidBoundaryError::AtOrAfterTargetEnd {
            boundary,
            target_end: target.range.end(),
        });
    }

    let new_source_range = if boundary == source.range.start() {
        match collapse {
            SourceCollapse::Forbid => {
                return Err(InvalidBoundaryError::SourceCollapsed { boundary })
            }
            SourceCollapse::Allow => None,
        }
    } else {
        // boundary > start, so the range cannot invert here.
        Some(
            TimeRange::new(source.range.start(), boundary)
                .expect("start < boundary was just checked"),
        )
    };

    let new_target_range = TimeRange::new(boundary, target.range.end())
        .expect("boundary < target end was just checked");

    Ok(ReassignmentDetails {
        source_binding_id: source.id.clone(),
        new_source_range,
        target_binding_id: target.id.clone(),
        new_target_range,
    })
}
