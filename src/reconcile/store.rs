//! The persistence collaborator boundary.
//!
//! The kernel only classifies; something else performs the mutations. That
//! something implements [`ReconcileStore`], and [`apply_partition`] replays
//! a [`DiffPartition`] against it in the one order that is safe:
//!
//! 1. bulk delete
//! 2. bulk expire
//! 3. bulk unexpire
//! 4. create drafts
//! 5. update changed records
//!
//! Expiry transitions must land before content updates — a record that was
//! unexpired and edited is first reactivated, then updated, so expired
//! data is never resurrected by an update.
//!
//! [`InMemoryReconcileStore`] is the test implementation: it assigns ids on
//! create and keeps an operation log so tests can assert on ordering.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::diff::DiffPartition;
use crate::types::{Record, RecordId, RecordState};

/// A storage backend the reconciliation output is applied to.
///
/// Implementations map each method onto their per-entity CRUD verbs.
/// `create` returns the id the backend assigned to the draft.
pub trait ReconcileStore {
    /// Error type for store operations.
    type Error: std::error::Error;

    /// Persist a draft record, returning its new id.
    fn create(&mut self, record: &Record) -> Result<RecordId, Self::Error>;

    /// Overwrite a persisted record's payload.
    fn update(&mut self, record: &Record) -> Result<(), Self::Error>;

    /// Mark every listed record expired.
    fn expire_many(&mut self, ids: &[RecordId]) -> Result<(), Self::Error>;

    /// Mark every listed record active again.
    fn unexpire_many(&mut self, ids: &[RecordId]) -> Result<(), Self::Error>;

    /// Remove every listed record.
    fn delete_many(&mut self, ids: &[RecordId]) -> Result<(), Self::Error>;
}

/// Replay a partition against a store in the fixed safe order.
///
/// Bulk calls are skipped when their id list is empty. Returns the ids the
/// store assigned to created drafts, in input order.
///
/// # Errors
///
/// Propagates the first store error; earlier operations are not rolled
/// back. Transactionality is the store's concern, not the kernel's.
pub fn apply_partition<S: ReconcileStore>(
    store: &mut S,
    partition: &DiffPartition,
) -> Result<Vec<RecordId>, S::Error> {
    if !partition.deleted_ids.is_empty() {
        store.delete_many(&partition.deleted_ids)?;
    }
    if !partition.expired_ids.is_empty() {
        store.expire_many(&partition.expired_ids)?;
    }
    if !partition.unexpired_ids.is_empty() {
        store.unexpire_many(&partition.unexpired_ids)?;
    }

    let mut created = Vec::with_capacity(partition.added.len());
    for record in &partition.added {
        created.push(store.create(record)?);
    }
    for record in &partition.updated {
        store.update(record)?;
    }

    tracing::debug!(
        created = created.len(),
        updated = partition.updated.len(),
        expired = partition.expired_ids.len(),
        unexpired = partition.unexpired_ids.len(),
        deleted = partition.deleted_ids.len(),
        "partition applied"
    );

    Ok(created)
}

/// Error type for the in-memory store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryStoreError {
    /// An operation referenced an id the store does not hold.
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),
    /// `update` was called with a draft record.
    #[error("cannot update a draft record; create it first")]
    UpdateOfDraft,
}

/// One operation observed by the in-memory store, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// A draft was created under the given id.
    Create(RecordId),
    /// A record was updated.
    Update(RecordId),
    /// A bulk expire call.
    ExpireMany(Vec<RecordId>),
    /// A bulk unexpire call.
    UnexpireMany(Vec<RecordId>),
    /// A bulk delete call.
    DeleteMany(Vec<RecordId>),
}

/// In-memory reconcile store for testing.
///
/// Uses a `BTreeMap` for deterministic iteration and records every call in
/// an operation log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReconcileStore {
    records: BTreeMap<RecordId, Record>,
    ops: Vec<StoreOp>,
}

impl InMemoryReconcileStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already-persisted records. Drafts are ignored.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut store = Self::new();
        for record in records {
            if let Some(id) = record.id().cloned() {
                store.records.insert(id, record);
            }
        }
        store
    }

    /// Fetch a record by id.
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    /// All records, ordered by id.
    pub fn all_records(&self) -> Vec<&Record> {
        self.records.values().collect()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The operations applied so far, in call order.
    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    /// Current state of every record as a snapshot collection, ordered by
    /// id. Feeding this back as the next "initial" snapshot is how tests
    /// model consecutive edit sessions.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.values().cloned().collect()
    }

    fn set_expired(&mut self, ids: &[RecordId], is_expired: bool) -> Result<(), InMemoryStoreError> {
        for id in ids {
            let record = self
                .records
                .get_mut(id)
                .ok_or_else(|| InMemoryStoreError::RecordNotFound(id.clone()))?;
            record.is_expired = is_expired;
            if !is_expired {
                record.expiry_date = None;
            }
        }
        Ok(())
    }
}

impl ReconcileStore for InMemoryReconcileStore {
    type Error = InMemoryStoreError;

    fn create(&mut self, record: &Record) -> Result<RecordId, Self::Error> {
        let id = RecordId::new(Uuid::new_v4().to_string());
        let mut stored = record.clone();
        stored.state = RecordState::Persisted { id: id.clone() };
        self.records.insert(id.clone(), stored);
        self.ops.push(StoreOp::Create(id.clone()));
        Ok(id)
    }

    fn update(&mut self, record: &Record) -> Result<(), Self::Error> {
        let id = record.id().ok_or(InMemoryStoreError::UpdateOfDraft)?;
        let stored = self
            .records
            .get_mut(id)
            .ok_or_else(|| InMemoryStoreError::RecordNotFound(id.clone()))?;
        stored.payload = record.payload.clone();
        stored.expiry_date = record.expiry_date;
        self.ops.push(StoreOp::Update(id.clone()));
        Ok(())
    }

    fn expire_many(&mut self, ids: &[RecordId]) -> Result<(), Self::Error> {
        self.set_expired(ids, true)?;
        self.ops.push(StoreOp::ExpireMany(ids.to_vec()));
        Ok(())
    }

    fn unexpire_many(&mut self, ids: &[RecordId]) -> Result<(), Self::Error> {
        self.set_expired(ids, false)?;
        self.ops.push(StoreOp::UnexpireMany(ids.to_vec()));
        Ok(())
    }

    fn delete_many(&mut self, ids: &[RecordId]) -> Result<(), Self::Error> {
        for id in ids {
            self.records
                .remove(id)
                .ok_or_else(|| InMemoryStoreError::RecordNotFound(id.clone()))?;
        }
        self.ops.push(StoreOp::DeleteMany(ids.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_snapshots;
    use serde_json::json;

    #[test]
    fn test_create_assigns_an_id() {
        let mut store = InMemoryReconcileStore::new();
        let id = store.create(&Record::draft(json!({ "v": "a" }))).unwrap();
        let stored = store.get(&id).unwrap();
        assert_eq!(stored.id(), Some(&id));
        assert_eq!(stored.payload, json!({ "v": "a" }));
    }

    #[test]
    fn test_update_of_draft_is_rejected() {
        let mut store = InMemoryReconcileStore::new();
        let err = store.update(&Record::draft(json!({}))).unwrap_err();
        assert!(matches!(err, InMemoryStoreError::UpdateOfDraft));
    }

    #[test]
    fn test_delete_of_unknown_id_is_an_error() {
        let mut store = InMemoryReconcileStore::new();
        let err = store.delete_many(&[RecordId::from("nope")]).unwrap_err();
        assert!(matches!(err, InMemoryStoreError::RecordNotFound(_)));
    }

    #[test]
    fn test_apply_partition_order() {
        let initial = vec![
            Record::persisted("del-me", json!({ "v": "x" })),
            Record::persisted("expire-me", json!({ "v": "y" })),
            Record::persisted("revive-me", json!({ "v": "z" })).with_expired(true),
            Record::persisted("edit-me", json!({ "v": "old" })),
        ];
        let edited = vec![
            Record::persisted("expire-me", json!({ "v": "y" })).with_expired(true),
            Record::persisted("revive-me", json!({ "v": "z" })),
            Record::persisted("edit-me", json!({ "v": "new" })),
            Record::draft(json!({ "v": "fresh" })),
        ];

        let partition = diff_snapshots(&initial, &edited);
        let mut store = InMemoryReconcileStore::with_records(initial);
        let created = apply_partition(&mut store, &partition).unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(
            store.ops(),
            &[
                StoreOp::DeleteMany(vec![RecordId::from("del-me")]),
                StoreOp::ExpireMany(vec![RecordId::from("expire-me")]),
                StoreOp::UnexpireMany(vec![RecordId::from("revive-me")]),
                StoreOp::Create(created[0].clone()),
                StoreOp::Update(RecordId::from("edit-me")),
            ]
        );
    }

    #[test]
    fn test_apply_skips_empty_bulk_calls() {
        let partition = diff_snapshots(&[], &[Record::draft(json!({ "v": "a" }))]);
        let mut store = InMemoryReconcileStore::new();
        apply_partition(&mut store, &partition).unwrap();

        assert_eq!(store.ops().len(), 1);
        assert!(matches!(store.ops()[0], StoreOp::Create(_)));
    }
}
