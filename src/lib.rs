//! # roster-kernel
//!
//! Snapshot reconciliation and temporal conflict detection for duty rosters.
//!
//! The Roster Kernel answers two questions:
//!
//! > Given an edited copy of an administrative collection, which persistence
//! > operations move the stored collection to the edited state?
//!
//! > Does binding a person to a duty slot double-book them, and how is a
//! > detected conflict resolved?
//!
//! ## Core Contract
//!
//! 1. `diff_snapshots` partitions an edited collection against its initial
//!    snapshot into Added / Updated / Expired / Unexpired / Deleted
//! 2. `reconcile_all` runs the partition over every named sub-collection of
//!    a composite edit payload
//! 3. `apply_partition` replays a partition against a [`ReconcileStore`] in
//!    a fixed order: deletes, expiries, unexpiries, creates, updates
//! 4. `find_overlap` is the single source of truth for "is this a
//!    double-booking"; [`PlacementFlow`] drives the confirm/cancel override
//! 5. `resolve_reassignment` computes the boundary move between two
//!    adjacent duty bindings
//!
//! ## Architecture
//!
//! ```text
//! Edit surface → {initial, edited} snapshots → diff_snapshots → DiffPartition
//!                                                                    ↓
//!                                               apply_partition → ReconcileStore
//!
//! Scheduling surface → candidate binding → find_overlap → PlacementFlow
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same snapshot pair → identical partition (order within categories
//!   follows edited/initial input order)
//! - All engines are synchronous pure functions over caller-supplied
//!   in-memory snapshots; no I/O, no shared state
//! - Map outputs use `BTreeMap` for stable iteration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod diff;
pub mod reconcile;
pub mod assign;

// Re-exports
pub use types::{Record, RecordId, RecordState};
pub use types::{InvalidRangeError, TimeRange};
pub use types::{DutyBinding, DutySlot, PersonId, WorkSection};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use diff::{diff_snapshots, DiffPartition};
pub use reconcile::{reconcile_all, reconcile_key, snapshot_fingerprint, SnapshotMap};
pub use reconcile::store::{
    apply_partition, InMemoryReconcileStore, InMemoryStoreError, ReconcileStore, StoreOp,
};
pub use assign::overlap::{
    find_overlap, overlapping, PlacementFlow, PlacementRequest, PlacementState,
    DOUBLE_BOOKING_WARNING,
};
pub use assign::reassign::{
    resolve_reassignment, InvalidBoundaryError, ReassignmentDetails, SourceCollapse,
};

/// Schema version for all roster kernel types.
/// Increment on breaking changes to any schema type.
pub const ROSTER_KERNEL_SCHEMA_VERSION: &str = "1.0.0";
