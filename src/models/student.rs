//! Student, group, and house models.
//!
//! A *house* is the full population of a block, partitioned into
//! mentor-led *groups*. Students are immutable value types for the
//! duration of a run; equality is structural.

use serde::{Deserialize, Serialize};

/// Student gender as recorded at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    NotSpecified,
}

/// A student participating in a block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Student {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender.
    pub gender: Gender,
    /// Age in whole years.
    pub age: u32,
    /// Declared major.
    pub major: String,
}

impl Student {
    /// Creates a new student.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: Gender,
        age: u32,
        major: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
            age,
            major: major.into(),
        }
    }

    /// "First Last" display form.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A mentor together with the students assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    /// Mentor identifier.
    pub mentor: String,
    /// Students assigned to this mentor, in assignment order.
    pub students: Vec<Student>,
}

impl Group {
    /// Creates a group.
    pub fn new(mentor: impl Into<String>, students: Vec<Student>) -> Self {
        Self {
            mentor: mentor.into(),
            students,
        }
    }

    /// Whether the group contains the given student.
    pub fn contains(&self, student: &Student) -> bool {
        self.students.contains(student)
    }

    /// Whether any two students in the group share a last name.
    pub fn has_duplicate_last_name(&self) -> bool {
        for (i, a) in self.students.iter().enumerate() {
            if self.students[i + 1..].iter().any(|b| b.last_name == a.last_name) {
                return true;
            }
        }
        false
    }
}

/// The full student population of a block, partitioned into groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// Mentor-led groups, in mentor order.
    pub groups: Vec<Group>,
}

impl House {
    /// Creates a house from groups.
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// All students across all groups, in group order.
    pub fn students(&self) -> Vec<Student> {
        self.groups
            .iter()
            .flat_map(|g| g.students.iter().cloned())
            .collect()
    }

    /// Total number of students.
    pub fn student_count(&self) -> usize {
        self.groups.iter().map(|g| g.students.len()).sum()
    }

    /// The group a student belongs to, if any.
    pub fn group_of(&self, student: &Student) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(student))
    }
}

/// Two distinct students assigned to the bedside and peer roles of a
/// peer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerPair {
    /// Student playing the bedside role.
    pub bedside: Student,
    /// Student playing the peer role.
    pub peer: Student,
}

impl PeerPair {
    /// Creates a pair, or `None` when both roles name the same student.
    pub fn new(bedside: Student, peer: Student) -> Option<Self> {
        if bedside == peer {
            return None;
        }
        Some(Self { bedside, peer })
    }
}
