//! Duty slots and person-duty bindings.
//!
//! A [`DutySlot`] is a schedulable unit of work on the roster timeline:
//! a time range, a required headcount, and the bindings currently attached
//! to it. A [`DutyBinding`] ties one person (or a vacancy) to a sub-range
//! of the slot, which is what makes partial reassignment possible — a
//! binding's range need not span the whole slot.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::RecordId;
use super::time_range::TimeRange;

/// Unique identifier for a person on the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    /// Create a person id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Work section a duty belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkSection {
    /// Courtroom duties.
    Courts,
    /// Jail duties.
    Jail,
    /// Prisoner escort runs.
    Escorts,
    /// Anything else.
    Other,
}

impl WorkSection {
    /// Parse a work section from its wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "COURTS" => Some(Self::Courts),
            "JAIL" => Some(Self::Jail),
            "ESCORTS" => Some(Self::Escorts),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for WorkSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Courts => write!(f, "COURTS"),
            Self::Jail => write!(f, "JAIL"),
            Self::Escorts => write!(f, "ESCORTS"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// The association between a person and a duty slot for a sub-range of
/// that slot's time.
///
/// `person` is `None` while the binding is an unfilled bar waiting for a
/// drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyBinding {
    /// Binding id, assigned by the persistence layer.
    pub id: RecordId,
    /// The person bound, if any.
    pub person: Option<PersonId>,
    /// The portion of the slot this binding covers.
    pub range: TimeRange,
}

impl DutyBinding {
    /// Create an unassigned binding covering `range`.
    pub fn vacant(id: impl Into<RecordId>, range: TimeRange) -> Self {
        Self {
            id: id.into(),
            person: None,
            range,
        }
    }

    /// Create a binding assigned to `person`.
    pub fn assigned(id: impl Into<RecordId>, person: impl Into<PersonId>, range: TimeRange) -> Self {
        Self {
            id: id.into(),
            person: Some(person.into()),
            range,
        }
    }

    /// Whether this binding is held by the given person.
    pub fn is_held_by(&self, person: &PersonId) -> bool {
        self.person.as_ref() == Some(person)
    }
}

/// A schedulable unit of work requiring one or more persons for a fixed
/// time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutySlot {
    /// Slot id.
    pub id: RecordId,
    /// Work section the slot belongs to.
    pub work_section: WorkSection,
    /// The slot's full time range.
    pub range: TimeRange,
    /// How many persons the slot needs.
    pub sheriffs_required: u32,
    /// Bindings attached to the slot, filled or vacant.
    pub bindings: Vec<DutyBinding>,
}

impl DutySlot {
    /// Create an empty slot.
    pub fn new(
        id: impl Into<RecordId>,
        work_section: WorkSection,
        range: TimeRange,
        sheriffs_required: u32,
    ) -> Self {
        Self {
            id: id.into(),
            work_section,
            range,
            sheriffs_required,
            bindings: Vec::new(),
        }
    }

    /// Attach a binding.
    pub fn with_binding(mut self, binding: DutyBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Bindings held by a specific person.
    pub fn bindings_for(&self, person: &PersonId) -> Vec<&DutyBinding> {
        self.bindings.iter().filter(|b| b.is_held_by(person)).collect()
    }

    /// How many required positions are still unfilled.
    pub fn vacancies(&self) -> u32 {
        let assigned = self.bindings.iter().filter(|b| b.person.is_some()).count() as u32;
        self.sheriffs_required.saturating_sub(assigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn range(start_h: u32, end_h: u32) -> TimeRange {
        TimeRange::new(
            Utc.with_ymd_and_hms(2024, 3, 11, start_h, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 11, end_h, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_vacancies() {
        let slot = DutySlot::new("d1", WorkSection::Courts, range(9, 17), 2)
            .with_binding(DutyBinding::assigned("b1", "p1", range(9, 17)))
            .with_binding(DutyBinding::vacant("b2", range(9, 17)));
        assert_eq!(slot.vacancies(), 1);
    }

    #[test]
    fn test_vacancies_never_underflows() {
        let slot = DutySlot::new("d1", WorkSection::Jail, range(9, 17), 1)
            .with_binding(DutyBinding::assigned("b1", "p1", range(9, 13)))
            .with_binding(DutyBinding::assigned("b2", "p2", range(13, 17)));
        assert_eq!(slot.vacancies(), 0);
    }

    #[test]
    fn test_bindings_for_person() {
        let p1 = PersonId::from("p1");
        let slot = DutySlot::new("d1", WorkSection::Escorts, range(9, 17), 2)
            .with_binding(DutyBinding::assigned("b1", "p1", range(9, 13)))
            .with_binding(DutyBinding::assigned("b2", "p2", range(13, 17)));
        let held = slot.bindings_for(&p1);
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].id, RecordId::from("b1"));
    }

    #[test]
    fn test_work_section_codes() {
        assert_eq!(WorkSection::from_code("ESCORTS"), Some(WorkSection::Escorts));
        assert_eq!(WorkSection::from_code("courts"), None);
        assert_eq!(WorkSection::Jail.to_string(), "JAIL");
    }
}
