//! Snapshot diff computation engine.
//!
//! [`diff_snapshots`] compares two ordered collections of records by id and
//! produces a [`DiffPartition`]. The engine only classifies; it never
//! mutates a record and never talks to persistence.

use std::collections::{BTreeMap, BTreeSet};

use crate::diff::partition::DiffPartition;
use crate::types::{Record, RecordId};

/// Compare an edited collection against its initial snapshot.
///
/// Classification, in order:
///
/// 1. Draft records (no id) → `added`.
/// 2. Persisted records present in both snapshots:
///    - expiry flag `false → true` → `expired`; `true → false` →
///      `unexpired`;
///    - payload changed and the edited record is not expired → `updated`.
///      Payload comparison is deep and insensitive to object-key order;
///      the expiry flag and date are not part of the payload and never
///      count as a content change.
/// 3. Persisted initial records whose id is gone from the edited snapshot
///    → `deleted`.
///
/// An edited id with no counterpart in the initial snapshot is a stale
/// reference: it is recorded in `stale_ids`, warned about, and classified
/// nowhere. Empty results are normal; nothing here is an error.
pub fn diff_snapshots(initial: &[Record], edited: &[Record]) -> DiffPartition {
    // Id index of the initial snapshot. Drafts carry no id and cannot be
    // matched, so they are ignored here.
    let initial_by_id: BTreeMap<&RecordId, &Record> = initial
        .iter()
        .filter_map(|r| r.id().map(|id| (id, r)))
        .collect();

    let edited_ids: BTreeSet<&RecordId> = edited.iter().filter_map(|r| r.id()).collect();

    let mut partition = DiffPartition::default();

    for record in edited {
        let Some(id) = record.id() else {
            partition.added.push(record.clone());
            continue;
        };

        let Some(before) = initial_by_id.get(id) else {
            tracing::warn!(
                record_id = %id,
                "edited record has no counterpart in the initial snapshot; \
                 excluded from classification"
            );
            partition.stale_ids.push(id.clone());
            continue;
        };

        // Expiry transition, independent of content classification.
        if record.is_expired && !before.is_expired {
            partition.expired.push(record.clone());
            partition.expired_ids.push(id.clone());
        } else if !record.is_expired && before.is_expired {
            partition.unexpired.push(record.clone());
            partition.unexpired_ids.push(id.clone());
        }

        // Expired records are never updated; callers unexpire before they
        // update, so an unexpired record with content changes lands in both
        // buckets.
        if !record.is_expired && record.payload != before.payload {
            partition.updated.push(record.clone());
        }
    }

    for record in initial {
        if let Some(id) = record.id() {
            if !edited_ids.contains(id) {
                partition.deleted.push(record.clone());
                partition.deleted_ids.push(id.clone());
            }
        }
    }

    tracing::debug!(
        added = partition.added.len(),
        updated = partition.updated.len(),
        expired = partition.expired_ids.len(),
        unexpired = partition.unexpired_ids.len(),
        deleted = partition.deleted_ids.len(),
        stale = partition.stale_ids.len(),
        "snapshot diff computed"
    );

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn active(id: &str, v: &str) -> Record {
        Record::persisted(id, json!({ "v": v }))
    }

    fn expired(id: &str, v: &str) -> Record {
        Record::persisted(id, json!({ "v": v })).with_expired(true)
    }

    #[test]
    fn test_draft_is_only_ever_added() {
        let edited = vec![Record::draft(json!({ "v": "new" }))];
        let p = diff_snapshots(&[], &edited);

        assert_eq!(p.added.len(), 1);
        assert!(p.updated.is_empty());
        assert!(p.expired.is_empty());
        assert!(p.unexpired.is_empty());
        assert!(p.deleted.is_empty());
    }

    #[test]
    fn test_unchanged_record_classified_nowhere() {
        let initial = vec![active("1", "a")];
        let edited = vec![active("1", "a")];
        let p = diff_snapshots(&initial, &edited);
        assert!(p.is_empty());
        assert!(p.stale_ids.is_empty());
    }

    #[test]
    fn test_content_change_is_updated() {
        let initial = vec![active("1", "a")];
        let edited = vec![active("1", "b")];
        let p = diff_snapshots(&initial, &edited);

        assert_eq!(p.updated.len(), 1);
        assert_eq!(p.updated[0].id(), Some(&RecordId::from("1")));
        assert!(p.expired.is_empty());
    }

    #[test]
    fn test_payload_comparison_ignores_object_key_order() {
        let before: serde_json::Value =
            serde_json::from_str(r#"{"code":"JAIL","rank":2}"#).unwrap();
        let after: serde_json::Value =
            serde_json::from_str(r#"{"rank":2,"code":"JAIL"}"#).unwrap();

        let initial = vec![Record::persisted("1", before)];
        let edited = vec![Record::persisted("1", after)];
        assert!(diff_snapshots(&initial, &edited).is_empty());
    }

    #[test]
    fn test_expiry_transition_alone_is_not_an_update() {
        let initial = vec![active("1", "a")];
        let edited = vec![expired("1", "a")];
        let p = diff_snapshots(&initial, &edited);

        assert_eq!(p.expired_ids, vec![RecordId::from("1")]);
        assert!(p.updated.is_empty());
    }

    #[test]
    fn test_expired_record_is_never_updated() {
        // Content changed AND the record expired: only the expiry
        // transition is applied, so the stale content is not resurrected.
        let initial = vec![active("1", "a")];
        let edited = vec![expired("1", "b")];
        let p = diff_snapshots(&initial, &edited);

        assert_eq!(p.expired_ids, vec![RecordId::from("1")]);
        assert!(p.updated.is_empty());
    }

    #[test]
    fn test_unexpired_record_with_changes_lands_in_both_buckets() {
        let initial = vec![expired("1", "a")];
        let edited = vec![active("1", "b")];
        let p = diff_snapshots(&initial, &edited);

        assert_eq!(p.unexpired_ids, vec![RecordId::from("1")]);
        assert_eq!(p.updated.len(), 1);
    }

    #[test]
    fn test_removed_record_is_deleted() {
        let initial = vec![active("1", "a"), active("2", "b")];
        let edited = vec![active("1", "a")];
        let p = diff_snapshots(&initial, &edited);

        assert_eq!(p.deleted_ids, vec![RecordId::from("2")]);
        assert_eq!(p.deleted.len(), 1);
    }

    #[test]
    fn test_stale_id_is_flagged_and_classified_nowhere() {
        let initial = vec![active("1", "a")];
        let edited = vec![active("1", "a"), active("99", "ghost")];
        let p = diff_snapshots(&initial, &edited);

        assert_eq!(p.stale_ids, vec![RecordId::from("99")]);
        assert!(p.is_empty());
        // A stale id is not a deletion either.
        assert!(p.deleted_ids.is_empty());
    }

    #[test]
    fn test_spec_scenario() {
        // initial: {1, active, "a"}, {2, active, "b"}
        // edited:  {1, expired, "a"}, {3 draft, "c"}
        let initial = vec![active("1", "a"), active("2", "b")];
        let edited = vec![expired("1", "a"), Record::draft(json!({ "v": "c" }))];
        let p = diff_snapshots(&initial, &edited);

        assert_eq!(p.added.len(), 1);
        assert_eq!(p.expired_ids, vec![RecordId::from("1")]);
        assert_eq!(p.deleted_ids, vec![RecordId::from("2")]);
        assert!(p.updated.is_empty());
        assert!(p.unexpired.is_empty());
    }

    /// Strategy: a pool of small ids, each persisted record active or
    /// expired with a tiny payload.
    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        proptest::collection::vec((0u8..20, any::<bool>(), 0u8..4), 0..12).prop_map(|entries| {
            let mut seen = BTreeSet::new();
            entries
                .into_iter()
                .filter(|(id, _, _)| seen.insert(*id))
                .map(|(id, is_expired, v)| {
                    Record::persisted(id.to_string(), json!({ "v": v })).with_expired(is_expired)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_deleted_ids_is_exact_set_difference(
            initial in arb_records(),
            edited in arb_records(),
        ) {
            let p = diff_snapshots(&initial, &edited);

            let initial_ids: BTreeSet<_> =
                initial.iter().filter_map(|r| r.id().cloned()).collect();
            let edited_ids: BTreeSet<_> =
                edited.iter().filter_map(|r| r.id().cloned()).collect();
            let expected: BTreeSet<_> =
                initial_ids.difference(&edited_ids).cloned().collect();

            let got: BTreeSet<_> = p.deleted_ids.iter().cloned().collect();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn prop_expiry_buckets_are_disjoint_and_updated_excludes_expired(
            initial in arb_records(),
            edited in arb_records(),
        ) {
            let p = diff_snapshots(&initial, &edited);

            let expired: BTreeSet<_> = p.expired_ids.iter().collect();
            let unexpired: BTreeSet<_> = p.unexpired_ids.iter().collect();
            prop_assert!(expired.is_disjoint(&unexpired));

            for r in &p.updated {
                prop_assert!(!r.is_expired);
                let id = r.id().expect("updated records are persisted");
                prop_assert!(!expired.contains(id));
            }
        }
    }
}
