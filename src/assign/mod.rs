//! Temporal assignment: double-booking detection, the confirm/cancel
//! placement protocol, and boundary reassignment between adjacent duty
//! bindings.

pub mod overlap;
pub mod reassign;

pub use overlap::{
    find_overlap, overlapping, PlacementFlow, PlacementRequest, PlacementState,
    DOUBLE_BOOKING_WARNING,
};
pub use reassign::{
    resolve_reassignment, InvalidBoundaryError, ReassignmentDetails, SourceCollapse,
};
