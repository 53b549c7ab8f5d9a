//! The five-way partition produced by a snapshot comparison.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::{Record, RecordId};

/// The outcome of comparing one named collection's edited snapshot against
/// its initial snapshot.
///
/// Category semantics:
///
/// - `added`: drafts — records with no id yet
/// - `updated`: persisted records whose payload changed and which are not
///   expired in the edited snapshot
/// - `expired` / `unexpired`: records whose soft-expiry flag transitioned
/// - `deleted`: records present initially whose id is gone from the edited
///   snapshot
///
/// Categories are disjoint per record, with one deliberate exception: a
/// record that was unexpired *and* edited appears in both `unexpired` and
/// `updated` (the persistence layer unexpires before it updates, so the
/// combination is safe). Expired records are never `updated`.
///
/// `stale_ids` is diagnostic only: edited ids with no counterpart in the
/// initial snapshot. They belong to no category and usually mean the
/// caller diffed against something other than the immediately preceding
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffPartition {
    /// Draft records to create.
    pub added: Vec<Record>,
    /// Changed, non-expired records to update.
    pub updated: Vec<Record>,
    /// Records transitioning active → expired.
    pub expired: Vec<Record>,
    /// Ids of `expired`, for the bulk-expire call.
    pub expired_ids: Vec<RecordId>,
    /// Records transitioning expired → active.
    pub unexpired: Vec<Record>,
    /// Ids of `unexpired`, for the bulk-unexpire call.
    pub unexpired_ids: Vec<RecordId>,
    /// Initial-snapshot records removed from the edited snapshot.
    pub deleted: Vec<Record>,
    /// Ids of `deleted`, for the bulk-delete call.
    pub deleted_ids: Vec<RecordId>,
    /// Edited ids absent from the initial snapshot; classified nowhere.
    pub stale_ids: Vec<RecordId>,
}

impl DiffPartition {
    /// Whether the comparison found no work at all.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.updated.is_empty()
            && self.expired.is_empty()
            && self.unexpired.is_empty()
            && self.deleted.is_empty()
    }

    /// Total number of persistence operations this partition implies.
    pub fn op_count(&self) -> usize {
        self.added.len()
            + self.updated.len()
            + self.expired.len()
            + self.unexpired.len()
            + self.deleted.len()
    }

    /// Deterministic fingerprint of the partition, for golden tests and
    /// audit logs.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}
