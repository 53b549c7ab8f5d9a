//! Double-booking detection and the placement confirmation protocol.
//!
//! [`find_overlap`] is the single source of truth for "is this a
//! double-booking": it asks whether any of a person's existing duty
//! bindings overlaps the candidate range.
//!
//! Overlap is a soft warning, not a hard constraint. Operational reality
//! (emergency coverage) can require double-booking, so the kernel never
//! blocks a placement — it routes a conflicting one through
//! [`PlacementFlow`], which holds the placement until the scheduling
//! surface confirms or cancels.

use serde::{Deserialize, Serialize};

use crate::types::{DutyBinding, PersonId, RecordId, TimeRange};

/// The warning shown when a placement would double-book a person.
pub const DOUBLE_BOOKING_WARNING: &str = "This sheriff is assigned to more than one duty at \
     this time. Please confirm you would like to double book this sheriff.";

/// The existing bindings that overlap a candidate range.
///
/// `existing` should be the bindings currently held by the person being
/// placed, across all duties known for them.
pub fn overlapping<'a>(candidate: &TimeRange, existing: &'a [DutyBinding]) -> Vec<&'a DutyBinding> {
    existing
        .iter()
        .filter(|binding| binding.range.overlaps(candidate))
        .collect()
}

/// Whether any existing binding overlaps the candidate range.
pub fn find_overlap(candidate: &TimeRange, existing: &[DutyBinding]) -> bool {
    existing.iter().any(|binding| binding.range.overlaps(candidate))
}

/// A placement the scheduling surface wants to apply: bind `person` into
/// the vacant binding `binding_id` of slot `slot_id` for `range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// The person being placed.
    pub person: PersonId,
    /// The duty slot receiving the person.
    pub slot_id: RecordId,
    /// The binding within the slot being filled.
    pub binding_id: RecordId,
    /// The time range the binding covers.
    pub range: TimeRange,
}

/// Where a placement currently stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlacementState {
    /// No placement pending.
    Idle,
    /// The placement conflicts with an existing binding; held until the
    /// surface confirms or cancels.
    AwaitingConfirmation {
        /// The held placement.
        request: PlacementRequest,
        /// Human-readable warning for the confirmation prompt.
        warning: String,
    },
    /// The placement is cleared to apply.
    Committed {
        /// The placement to apply.
        request: PlacementRequest,
    },
}

/// Drives one placement through detection and confirmation.
///
/// The surface owns the transitions: it calls [`propose`] on drop,
/// renders the prompt while the flow is awaiting confirmation, and calls
/// [`confirm`] or [`cancel`] from the prompt's buttons. A proposal is
/// evaluated immediately — a clean placement commits without pausing.
///
/// [`propose`]: PlacementFlow::propose
/// [`confirm`]: PlacementFlow::confirm
/// [`cancel`]: PlacementFlow::cancel
#[derive(Debug, Clone, Default)]
pub struct PlacementFlow {
    state: PlacementState,
}

impl Default for PlacementState {
    fn default() -> Self {
        Self::Idle
    }
}

impl PlacementFlow {
    /// Create a flow with no placement pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    /// Evaluate a pending placement against the person's existing
    /// bindings.
    ///
    /// No overlap → `Committed`. Overlap → `AwaitingConfirmation` with the
    /// double-booking warning; the placement is not applied yet. Any
    /// previously pending placement is discarded.
    pub fn propose(&mut self, request: PlacementRequest, existing: &[DutyBinding]) -> &PlacementState {
        if find_overlap(&request.range, existing) {
            tracing::debug!(
                person = %request.person,
                binding = %request.binding_id,
                "placement overlaps an existing binding; awaiting confirmation"
            );
            self.state = PlacementState::AwaitingConfirmation {
                request,
                warning: DOUBLE_BOOKING_WARNING.to_string(),
            };
        } else {
            self.state = PlacementState::Committed { request };
        }
        &self.state
    }

    /// Apply the held placement despite the warning.
    ///
    /// Returns `None` unless the flow is awaiting confirmation.
    pub fn confirm(&mut self) -> Option<&PlacementState> {
        match std::mem::take(&mut self.state) {
            PlacementState::AwaitingConfirmation { request, .. } => {
                self.state = PlacementState::Committed { request };
                Some(&self.state)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Discard the held placement and return to idle.
    pub fn cancel(&mut self) {
        self.state = PlacementState::Idle;
    }

    /// Take the committed placement for application, resetting to idle.
    ///
    /// Returns `None` if nothing has committed.
    pub fn take_committed(&mut self) -> Option<PlacementRequest> {
        match std::mem::take(&mut self.state) {
            PlacementState::Committed { request } => Some(request),
            other => {
                self.state = other;
                None
            }
        }
    }
}
