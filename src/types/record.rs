//! Administrative records as seen by the reconciliation engine.
//!
//! A [`Record`] is anything an admin edit screen manages: assignment types,
//! leave codes, court roles, frontend scopes. The engine only cares about
//! three things: the record's identity, its soft-expiry state, and an
//! opaque payload it can compare.
//!
//! Identity is a tagged [`RecordState`] rather than an optional id field: a
//! `Draft` has never been persisted, a `Persisted` record is matched by its
//! id across snapshots. This removes the ambiguity between "new record" and
//! "record whose id we failed to look up".

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use chrono::{DateTime, Utc};

/// Unique identifier for a persisted record.
///
/// Opaque string assigned by the persistence layer on first create.
/// Implements `Ord` for deterministic ordering in maps and id lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Create a record id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Persistence state of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RecordState {
    /// Created on the edit surface, never saved; has no id yet.
    Draft,
    /// Saved at least once; matched by id across snapshots.
    Persisted {
        /// The id assigned by the persistence layer.
        id: RecordId,
    },
}

impl RecordState {
    /// The record id, if the record has been persisted.
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            Self::Draft => None,
            Self::Persisted { id } => Some(id),
        }
    }
}

/// A record in one snapshot of an administrative collection.
///
/// The payload is an opaque JSON value; the engine compares it without
/// interpreting it. Expiry fields live outside the payload so that content
/// comparison naturally excludes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Draft vs persisted identity.
    pub state: RecordState,
    /// Soft-expiry flag. Expired records stay visible but inactive.
    #[serde(default)]
    pub is_expired: bool,
    /// When the record expired or will expire, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Everything else about the record.
    pub payload: Value,
}

impl Record {
    /// Create a draft record from a payload.
    pub fn draft(payload: Value) -> Self {
        Self {
            state: RecordState::Draft,
            is_expired: false,
            expiry_date: None,
            payload,
        }
    }

    /// Create an active persisted record.
    pub fn persisted(id: impl Into<RecordId>, payload: Value) -> Self {
        Self {
            state: RecordState::Persisted { id: id.into() },
            is_expired: false,
            expiry_date: None,
            payload,
        }
    }

    /// The record id, if persisted.
    pub fn id(&self) -> Option<&RecordId> {
        self.state.id()
    }

    /// Whether this record has never been saved.
    pub fn is_draft(&self) -> bool {
        matches!(self.state, RecordState::Draft)
    }

    /// Copy of this record with the expiry flag set.
    pub fn with_expired(mut self, is_expired: bool) -> Self {
        self.is_expired = is_expired;
        self
    }

    /// Copy of this record with an expiry date set.
    pub fn with_expiry_date(mut self, expiry_date: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_has_no_id() {
        let r = Record::draft(json!({ "code": "ESCORTS" }));
        assert!(r.is_draft());
        assert_eq!(r.id(), None);
    }

    #[test]
    fn test_persisted_id_round_trips_through_serde() {
        let r = Record::persisted("role-7", json!({ "code": "COURTS" })).with_expired(true);
        let json = serde_json::to_string(&r).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), Some(&RecordId::from("role-7")));
        assert!(back.is_expired);
    }

    #[test]
    fn test_expiry_fields_live_outside_payload() {
        let r = Record::persisted("x", json!({ "a": 1 }))
            .with_expired(true)
            .with_expiry_date(Utc::now());
        assert_eq!(r.payload, json!({ "a": 1 }));
    }
}
