//! Block, block schedule, and attendance history.
//!
//! A *block* is a time-bounded offering of a course: a date range, the
//! house attending it, and the activities held during it. A
//! [`BlockSchedule`] is a block together with its materialized, enrolled
//! sessions. The [`AttendanceRecord`] carries what each student attended
//! in prior blocks of the same course this academic year.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::activity::Activity;
use super::session::{ActivitySessions, Session};
use super::student::{House, Student};

/// A time-bounded offering of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Course this block belongs to.
    pub course: String,
    /// Block name.
    pub name: String,
    /// First day of the block.
    pub start: NaiveDate,
    /// Last day of the block (inclusive).
    pub end: NaiveDate,
    /// The students attending, partitioned into groups.
    pub house: House,
    /// Activities held during the block, in definition order.
    pub activities: Vec<Activity>,
}

impl Block {
    /// Creates a block.
    pub fn new(
        course: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        house: House,
        activities: Vec<Activity>,
    ) -> Self {
        Self {
            course: course.into(),
            name: name.into(),
            start,
            end,
            house,
            activities,
        }
    }

    /// Looks up an activity by name.
    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name == name)
    }
}

/// A block together with its scheduled sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSchedule {
    /// The block being scheduled.
    pub block: Block,
    /// Sessions per activity, in block activity order.
    pub activity_sessions: Vec<ActivitySessions>,
}

impl BlockSchedule {
    /// Creates a block schedule.
    pub fn new(block: Block, activity_sessions: Vec<ActivitySessions>) -> Self {
        Self {
            block,
            activity_sessions,
        }
    }

    /// The sessions of a named activity.
    pub fn sessions_for(&self, activity_name: &str) -> Option<&ActivitySessions> {
        self.activity_sessions
            .iter()
            .find(|entry| entry.activity.name == activity_name)
    }

    /// Every (activity, session) pair in the schedule.
    pub fn all_sessions(&self) -> impl Iterator<Item = (&Activity, &Session)> {
        self.activity_sessions
            .iter()
            .flat_map(|entry| entry.sessions.iter().map(move |s| (&entry.activity, s)))
    }

    /// Total number of sessions across all activities.
    pub fn session_count(&self) -> usize {
        self.activity_sessions.iter().map(|e| e.sessions.len()).sum()
    }
}

/// One prior-block attendance: which activity, on which date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorAttendance {
    /// Activity name.
    pub activity: String,
    /// Session date.
    pub date: NaiveDate,
}

/// Prior-block attendance by student, for one course in one academic year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    records: HashMap<Student, Vec<PriorAttendance>>,
}

impl AttendanceRecord {
    /// Creates an empty record (first block of the year).
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a student attended an activity session in a prior block.
    pub fn record(&mut self, student: Student, activity: impl Into<String>, date: NaiveDate) {
        self.records.entry(student).or_default().push(PriorAttendance {
            activity: activity.into(),
            date,
        });
    }

    /// Whether the student attended the named activity in any prior block.
    pub fn has_attended(&self, student: &Student, activity_name: &str) -> bool {
        self.records
            .get(student)
            .is_some_and(|entries| entries.iter().any(|e| e.activity == activity_name))
    }

    /// All prior attendances of a student.
    pub fn attendances(&self, student: &Student) -> &[PriorAttendance] {
        self.records.get(student).map(Vec::as_slice).unwrap_or(&[])
    }
}
