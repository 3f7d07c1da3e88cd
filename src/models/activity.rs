//! Activity model: time slots, frequencies, and enrollment criteria.
//!
//! An activity is a scheduled educational event type. Its *frequency*
//! determines the concrete time grid of sessions inside a block; its
//! *enrollment criteria* determine who is eligible and how enrollment is
//! decided.
//!
//! # Identity
//!
//! Activities are compared and hashed by name only. Overflow activities
//! reference their master by name for the same reason: activities are kept
//! in a flat table keyed by name, never embedded in each other, so hot
//! loops compare a single string instead of deep structures.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A concrete time window on a specific date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Calendar date.
    pub date: NaiveDate,
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Creates a time slot.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }

    /// Whether two slots strictly intersect on the same date.
    ///
    /// Sharing only an endpoint is not overlap: a 12–3pm slot and a 3–6pm
    /// slot on the same day do not conflict.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}

/// How often an activity's sessions recur within a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// A single session at a fixed date and time.
    Once(TimeSlot),
    /// An explicit list of dated sessions.
    SpecificTimes(Vec<TimeSlot>),
    /// Sessions every 7 days from block start through block end inclusive,
    /// at each listed `(start, end)` window.
    Weekly(Vec<(NaiveTime, NaiveTime)>),
}

impl Frequency {
    /// Materializes the concrete time slots for a block running from
    /// `block_start` through `block_end` inclusive.
    pub fn instances(&self, block_start: NaiveDate, block_end: NaiveDate) -> Vec<TimeSlot> {
        match self {
            Frequency::Once(slot) => vec![*slot],
            Frequency::SpecificTimes(slots) => slots.clone(),
            Frequency::Weekly(windows) => weekly_dates(block_start, block_end)
                .flat_map(|date| {
                    windows
                        .iter()
                        .map(move |&(start, end)| TimeSlot::new(date, start, end))
                })
                .collect(),
        }
    }
}

/// Dates every 7 days from `start`, bounded by `end` inclusive.
fn weekly_dates(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |d| Some(*d + Duration::days(7)))
        .take_while(move |d| *d <= end)
}

/// Enrollment priority: higher-priority activities claim students first.
///
/// Ordering follows declaration order, so ascending sorts place `Highest`
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Highest,
    High,
    Neutral,
    Low,
    Lowest,
}

/// Per-block attendance rule for house-wide activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HouseRule {
    /// Every eligible student attends every session.
    AttendEverySession,
    /// Each student attends once across all blocks of the course this year.
    AttendOnceThisYear,
}

/// How students are selected into an activity's sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentCriteria {
    /// One bedside and one peer per session, drawn from the student's own
    /// group. Each student fulfills each role `times_per_block` times.
    SelectTwoPeers {
        /// Required count per role per block.
        times_per_block: u32,
    },
    /// Up to `cap` students per session, drawn from the whole house.
    SelectMaxStudents {
        /// Maximum students per session.
        cap: usize,
        /// Attendance rule applied to the house.
        rule: HouseRule,
    },
    /// The entire house attends; marks the activity as mandatory.
    SelectAllStudents {
        /// Attendance rule applied to the house.
        rule: HouseRule,
    },
    /// Sessions mirror the master activity's time grid; enrollment is the
    /// complement of the master's enrollment in each matching session.
    OverflowFrom {
        /// Name of the master activity.
        master: String,
    },
}

/// The attendance requirement an activity imposes on one student, derived
/// from the enrollment criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceRequirement {
    /// Attend every session of the activity this block.
    EverySession,
    /// Attend once across all blocks of the course this year.
    OnceThisYear,
    /// Fulfill the bedside and peer roles `times_per_block` times each.
    PeerRoles {
        /// Required count per role.
        times_per_block: u32,
    },
    /// No requirement (overflow activities).
    NoRequirement,
}

impl AttendanceRequirement {
    /// Required credit count for a block with `session_count` sessions of
    /// the activity.
    pub fn required_credits(&self, session_count: usize) -> u32 {
        match self {
            AttendanceRequirement::EverySession => session_count as u32,
            AttendanceRequirement::OnceThisYear => 1,
            AttendanceRequirement::PeerRoles { times_per_block } => 2 * times_per_block,
            AttendanceRequirement::NoRequirement => 0,
        }
    }
}

/// A scheduled educational event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Activity name; the identity used for equality and hashing.
    pub name: String,
    /// Session recurrence within a block.
    pub frequency: Frequency,
    /// Enrollment priority.
    pub priority: Priority,
    /// Student selection rule.
    pub criteria: EnrollmentCriteria,
}

impl Activity {
    /// Creates an activity.
    pub fn new(
        name: impl Into<String>,
        frequency: Frequency,
        priority: Priority,
        criteria: EnrollmentCriteria,
    ) -> Self {
        Self {
            name: name.into(),
            frequency,
            priority,
            criteria,
        }
    }

    /// Whether the whole house attends every session (mandatory band).
    pub fn is_mandatory(&self) -> bool {
        matches!(self.criteria, EnrollmentCriteria::SelectAllStudents { .. })
    }

    /// Whether this activity mirrors a master activity (overflow band).
    pub fn is_overflow(&self) -> bool {
        matches!(self.criteria, EnrollmentCriteria::OverflowFrom { .. })
    }

    /// Whether this activity is scheduled by the constructive enrollers.
    pub fn is_unordered(&self) -> bool {
        !self.is_mandatory() && !self.is_overflow()
    }

    /// The attendance requirement this activity imposes on one student.
    pub fn requirement(&self) -> AttendanceRequirement {
        match &self.criteria {
            EnrollmentCriteria::SelectTwoPeers { times_per_block } => {
                AttendanceRequirement::PeerRoles {
                    times_per_block: *times_per_block,
                }
            }
            EnrollmentCriteria::SelectMaxStudents { rule, .. }
            | EnrollmentCriteria::SelectAllStudents { rule } => match rule {
                HouseRule::AttendEverySession => AttendanceRequirement::EverySession,
                HouseRule::AttendOnceThisYear => AttendanceRequirement::OnceThisYear,
            },
            EnrollmentCriteria::OverflowFrom { .. } => AttendanceRequirement::NoRequirement,
        }
    }

    /// Per-session enrollment capacity given the house size.
    pub fn capacity(&self, house_size: usize) -> usize {
        match &self.criteria {
            EnrollmentCriteria::SelectTwoPeers { .. } => 2,
            EnrollmentCriteria::SelectMaxStudents { cap, .. } => *cap,
            EnrollmentCriteria::SelectAllStudents { .. }
            | EnrollmentCriteria::OverflowFrom { .. } => house_size,
        }
    }
}

impl PartialEq for Activity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Activity {}

impl Hash for Activity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
