//! Core types for the roster kernel.

pub mod record;
pub mod time_range;
pub mod duty;

pub use record::{Record, RecordId, RecordState};
pub use time_range::{InvalidRangeError, TimeRange};
pub use duty::{DutyBinding, DutySlot, PersonId, WorkSection};
