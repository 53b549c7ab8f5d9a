//! Reconciliation across the named sub-collections of a composite edit
//! payload.
//!
//! An admin form edits one or more named collections at once (e.g. a
//! "court roles" screen edits just `courtRoles`, while an assignment-types
//! screen edits `courtRoles` and `jailRoles` together). The coordinator
//! runs the snapshot differ per key and collects the partitions.

pub mod store;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::canonical::canonical_hash_hex;
use crate::diff::{diff_snapshots, DiffPartition};
use crate::types::Record;
use crate::ROSTER_KERNEL_SCHEMA_VERSION;

/// Snapshots of several named collections, keyed by collection name.
pub type SnapshotMap = BTreeMap<String, Vec<Record>>;

static EMPTY: &[Record] = &[];

/// Diff every named sub-collection of `edited` against `initial`.
///
/// Operates on the union of the two key sets; a key missing on either side
/// is treated as an empty collection there, never as an error. Pure
/// computation: the inputs are not touched.
pub fn reconcile_all(initial: &SnapshotMap, edited: &SnapshotMap) -> BTreeMap<String, DiffPartition> {
    let keys: BTreeSet<&str> = initial
        .keys()
        .chain(edited.keys())
        .map(|k| k.as_str())
        .collect();

    keys.into_iter()
        .map(|key| {
            let before = initial.get(key).map_or(EMPTY, Vec::as_slice);
            let after = edited.get(key).map_or(EMPTY, Vec::as_slice);
            (key.to_string(), diff_snapshots(before, after))
        })
        .collect()
}

/// Diff a single named sub-collection.
///
/// For callers that manage one collection and want the partition directly
/// rather than a one-entry map. A key absent from either snapshot is an
/// empty collection on that side.
pub fn reconcile_key(initial: &SnapshotMap, edited: &SnapshotMap, key: &str) -> DiffPartition {
    let before = initial.get(key).map_or(EMPTY, Vec::as_slice);
    let after = edited.get(key).map_or(EMPTY, Vec::as_slice);
    diff_snapshots(before, after)
}

/// Deterministic fingerprint of a snapshot map.
///
/// Callers capture this when they take the initial snapshot and compare it
/// before committing, to prove the diff ran against the immediately
/// preceding snapshot and not some earlier state.
pub fn snapshot_fingerprint(snapshot: &SnapshotMap) -> String {
    #[derive(Serialize)]
    struct FingerprintInput<'a> {
        schema_version: &'static str,
        snapshot: &'a SnapshotMap,
    }

    canonical_hash_hex(&FingerprintInput {
        schema_version: ROSTER_KERNEL_SCHEMA_VERSION,
        snapshot,
    })
}
