//! Session and enrollment models.
//!
//! A session is one concrete time-instance of an activity. It carries the
//! set of students *eligible* to attend (fixed at generation time) and an
//! [`Enrollment`] value describing who was actually placed into it.
//!
//! # Identity
//!
//! Sessions are compared and hashed by a stable id derived from their
//! date, time window, and enrollable-student set, so two sessions with
//! identical content compare equal regardless of enrollment state. The
//! genetic crossover relies on this to match slots between parents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use super::activity::{Activity, TimeSlot};
use super::student::{Group, PeerPair, Student};

/// Who is enrolled in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enrollment {
    /// Nobody placed yet.
    Empty,
    /// A single student.
    Student(Student),
    /// A set of students.
    Students(BTreeSet<Student>),
    /// A bedside/peer pair.
    Peers(PeerPair),
    /// Whole groups (mandatory sessions).
    Groups(Vec<Group>),
}

impl Enrollment {
    /// The flattened set of enrolled students.
    pub fn students(&self) -> Vec<&Student> {
        match self {
            Enrollment::Empty => Vec::new(),
            Enrollment::Student(s) => vec![s],
            Enrollment::Students(set) => set.iter().collect(),
            Enrollment::Peers(pair) => vec![&pair.bedside, &pair.peer],
            Enrollment::Groups(groups) => {
                groups.iter().flat_map(|g| g.students.iter()).collect()
            }
        }
    }

    /// Number of enrolled students.
    pub fn len(&self) -> usize {
        match self {
            Enrollment::Empty => 0,
            Enrollment::Student(_) => 1,
            Enrollment::Students(set) => set.len(),
            Enrollment::Peers(_) => 2,
            Enrollment::Groups(groups) => groups.iter().map(|g| g.students.len()).sum(),
        }
    }

    /// Whether nobody is enrolled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the given student is enrolled.
    pub fn contains(&self, student: &Student) -> bool {
        match self {
            Enrollment::Empty => false,
            Enrollment::Student(s) => s == student,
            Enrollment::Students(set) => set.contains(student),
            Enrollment::Peers(pair) => &pair.bedside == student || &pair.peer == student,
            Enrollment::Groups(groups) => groups.iter().any(|g| g.contains(student)),
        }
    }
}

/// One concrete time-instance of an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Stable identity derived from slot and enrollable set.
    pub id: u64,
    /// Date and time window.
    pub slot: TimeSlot,
    /// Students eligible before any scheduling begins.
    pub enrollable: Vec<Student>,
    /// Current enrollment.
    pub enrollment: Enrollment,
}

impl Session {
    /// Creates an empty session for a slot and its eligible students.
    pub fn new(slot: TimeSlot, enrollable: Vec<Student>) -> Self {
        let id = session_id(&slot, &enrollable);
        Self {
            id,
            slot,
            enrollable,
            enrollment: Enrollment::Empty,
        }
    }

    /// Returns a copy with the given enrollment.
    pub fn with_enrollment(&self, enrollment: Enrollment) -> Self {
        Self {
            enrollment,
            ..self.clone()
        }
    }

    /// The enrolled students.
    pub fn enrolled(&self) -> Vec<&Student> {
        self.enrollment.students()
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Session {}

impl Hash for Session {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Deterministic session id: fixed-key hash over the slot and the sorted
/// enrollable set, so identical content always produces the same id.
fn session_id(slot: &TimeSlot, enrollable: &[Student]) -> u64 {
    use std::collections::hash_map::DefaultHasher;

    let mut hasher = DefaultHasher::new();
    slot.hash(&mut hasher);
    let mut sorted: Vec<&Student> = enrollable.iter().collect();
    sorted.sort();
    for student in sorted {
        student.hash(&mut hasher);
    }
    hasher.finish()
}

/// An activity together with the ordered list of its sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySessions {
    /// The activity.
    pub activity: Activity,
    /// Its sessions, ordered.
    pub sessions: Vec<Session>,
}

impl ActivitySessions {
    /// Creates an activity-sessions pair.
    pub fn new(activity: Activity, sessions: Vec<Session>) -> Self {
        Self { activity, sessions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::TimeSlot;
    use crate::models::student::Gender;
    use chrono::{NaiveDate, NaiveTime};

    fn slot(hour_start: u32, hour_end: u32) -> TimeSlot {
        TimeSlot::new(
            NaiveDate::from_ymd_opt(2015, 10, 27).unwrap(),
            NaiveTime::from_hms_opt(hour_start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(hour_end, 0, 0).unwrap(),
        )
    }

    fn student(first: &str, last: &str) -> Student {
        Student::new(first, last, Gender::Male, 23, "Medicine")
    }

    #[test]
    fn test_identical_content_same_id() {
        let a = Session::new(slot(13, 15), vec![student("Ada", "Lovelace")]);
        let b = Session::new(slot(13, 15), vec![student("Ada", "Lovelace")]);
        assert_eq!(a.id, b.id);
        assert_eq!(a, b);
    }

    #[test]
    fn test_enrollable_order_does_not_change_id() {
        let (x, y) = (student("Ada", "Lovelace"), student("Grace", "Hopper"));
        let a = Session::new(slot(13, 15), vec![x.clone(), y.clone()]);
        let b = Session::new(slot(13, 15), vec![y, x]);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_different_slot_different_id() {
        let a = Session::new(slot(13, 15), vec![student("Ada", "Lovelace")]);
        let b = Session::new(slot(14, 16), vec![student("Ada", "Lovelace")]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_enrollment_does_not_change_identity() {
        let a = Session::new(slot(13, 15), vec![student("Ada", "Lovelace")]);
        let filled = a.with_enrollment(Enrollment::Student(student("Ada", "Lovelace")));
        assert_eq!(a, filled);
    }

    #[test]
    fn test_enrollment_flattening() {
        assert!(Enrollment::Empty.is_empty());

        let pair = PeerPair::new(student("Ada", "Lovelace"), student("Grace", "Hopper")).unwrap();
        let peers = Enrollment::Peers(pair);
        assert_eq!(peers.len(), 2);
        assert!(peers.contains(&student("Ada", "Lovelace")));
        assert!(!peers.contains(&student("Edith", "Clarke")));

        let groups = Enrollment::Groups(vec![
            Group::new("m1", vec![student("Ada", "Lovelace")]),
            Group::new("m2", vec![student("Grace", "Hopper"), student("Edith", "Clarke")]),
        ]);
        assert_eq!(groups.len(), 3);
        assert!(groups.contains(&student("Edith", "Clarke")));
    }

    #[test]
    fn test_students_enrollment_set_semantics() {
        let mut set = BTreeSet::new();
        set.insert(student("Ada", "Lovelace"));
        set.insert(student("Ada", "Lovelace"));
        let e = Enrollment::Students(set);
        assert_eq!(e.len(), 1);
    }
}
