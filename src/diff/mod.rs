//! Snapshot reconciliation: partitioning an edited collection against its
//! initial snapshot.
//!
//! The entry point is [`diff_snapshots`], which produces a
//! [`DiffPartition`] describing the persistence operations needed to move
//! the stored collection to the edited state.

pub mod partition;
pub mod engine;

pub use engine::diff_snapshots;
pub use partition::DiffPartition;
