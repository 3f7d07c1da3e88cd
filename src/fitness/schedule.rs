//! Schedule fitness.
//!
//! Four dimensions, each 0–100:
//!
//! - **Student**: is every student on track to meet their credit
//!   requirements? Mean completion minus standard deviation.
//! - **Fullness**: how full are the non-overflow sessions? An *empty*
//!   session scores 100 on purpose: an activity correctly skipped this
//!   block (everyone already attended last block) must not tank the score.
//! - **Distribution**: what fraction of the house does each activity
//!   reach?
//! - **Diversity**: are enrollments within each activity spread evenly
//!   across students?
//!
//! The activities score is the mean of fullness, distribution, and
//! diversity; the overall fitness averages it with the student score.

use std::collections::HashSet;

use crate::models::{
    AttendanceRecord, AttendanceRequirement, BlockSchedule, Student,
};
use crate::scheduler::predicates::{bedside_count, peer_count};
use crate::stats::{mean, mean_minus_std_dev};

/// Per-dimension schedule scores, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleScore {
    /// Requirement coverage across students (mean − stddev).
    pub student: f64,
    /// Session enrollment fullness (mean − stddev).
    pub fullness: f64,
    /// Per-activity house reach (mean − stddev).
    pub distribution: f64,
    /// Within-activity enrollment evenness (plain mean).
    pub diversity: f64,
}

impl ScheduleScore {
    /// Scores a schedule against the attendance history.
    pub fn calculate(schedule: &BlockSchedule, attendance: &AttendanceRecord) -> Self {
        let students = schedule.block.house.students();
        Self {
            student: student_score(schedule, attendance, &students),
            fullness: fullness_score(schedule),
            distribution: distribution_score(schedule, students.len()),
            diversity: diversity_score(schedule, &students),
        }
    }

    /// Mean of fullness, distribution, and diversity.
    pub fn activities(&self) -> f64 {
        (self.fullness + self.distribution + self.diversity) / 3.0
    }

    /// The scalar fitness: mean of the student and activities scores.
    pub fn overall(&self) -> f64 {
        (self.student + self.activities()) / 2.0
    }
}

/// Mean per-student completion percentage, minus the population stddev.
fn student_score(
    schedule: &BlockSchedule,
    attendance: &AttendanceRecord,
    students: &[Student],
) -> f64 {
    if students.is_empty() || schedule.activity_sessions.is_empty() {
        return 0.0;
    }
    let completions: Vec<f64> = students
        .iter()
        .map(|student| {
            let per_activity: Vec<f64> = schedule
                .activity_sessions
                .iter()
                .map(|entry| {
                    let requirement = entry.activity.requirement();
                    let required = requirement.required_credits(entry.sessions.len());
                    if required == 0 {
                        return 100.0;
                    }
                    let satisfied = satisfied_credits(
                        student,
                        &requirement,
                        entry,
                        attendance,
                    );
                    100.0 * satisfied as f64 / required as f64
                })
                .collect();
            mean(&per_activity)
        })
        .collect();
    mean_minus_std_dev(&completions)
}

/// Credits a student has satisfied toward one activity this block.
fn satisfied_credits(
    student: &Student,
    requirement: &AttendanceRequirement,
    entry: &crate::models::ActivitySessions,
    attendance: &AttendanceRecord,
) -> u32 {
    match requirement {
        AttendanceRequirement::EverySession => entry
            .sessions
            .iter()
            .filter(|s| s.enrollment.contains(student))
            .count() as u32,
        AttendanceRequirement::OnceThisYear => {
            let attended_before = attendance.has_attended(student, &entry.activity.name);
            let attends_now = entry.sessions.iter().any(|s| s.enrollment.contains(student));
            u32::from(attended_before || attends_now)
        }
        AttendanceRequirement::PeerRoles { times_per_block } => {
            let bedside = bedside_count(student, &entry.sessions) as u32;
            let peer = peer_count(student, &entry.sessions) as u32;
            bedside.min(*times_per_block) + peer.min(*times_per_block)
        }
        AttendanceRequirement::NoRequirement => 0,
    }
}

/// Enrollment percentage per non-overflow session, mean − stddev.
fn fullness_score(schedule: &BlockSchedule) -> f64 {
    let house_size = schedule.block.house.student_count();
    let percentages: Vec<f64> = schedule
        .activity_sessions
        .iter()
        .filter(|entry| !entry.activity.is_overflow())
        .flat_map(|entry| {
            let capacity = entry.activity.capacity(house_size);
            entry.sessions.iter().map(move |session| {
                let enrolled = session.enrollment.len();
                if enrolled == 0 || capacity == 0 {
                    // An empty slot is not worse than a full one.
                    100.0
                } else {
                    100.0 * enrolled as f64 / capacity as f64
                }
            })
        })
        .collect();
    mean_minus_std_dev(&percentages)
}

/// Fraction of the house each activity reaches, mean − stddev.
fn distribution_score(schedule: &BlockSchedule, house_size: usize) -> f64 {
    if house_size == 0 {
        return 0.0;
    }
    let fractions: Vec<f64> = schedule
        .activity_sessions
        .iter()
        .map(|entry| {
            let distinct: HashSet<&Student> = entry
                .sessions
                .iter()
                .flat_map(|s| s.enrolled())
                .collect();
            100.0 * distinct.len() as f64 / house_size as f64
        })
        .collect();
    mean_minus_std_dev(&fractions)
}

/// Min-max-scaled per-student enrollment counts, averaged per activity and
/// across activities.
fn diversity_score(schedule: &BlockSchedule, students: &[Student]) -> f64 {
    if students.is_empty() {
        return 0.0;
    }
    let per_activity: Vec<f64> = schedule
        .activity_sessions
        .iter()
        .map(|entry| {
            let counts: Vec<f64> = students
                .iter()
                .map(|student| {
                    entry
                        .sessions
                        .iter()
                        .filter(|s| s.enrollment.contains(student))
                        .count() as f64
                })
                .collect();
            let min = counts.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = counts.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let scaled: Vec<f64> = if max == min {
                vec![1.0; counts.len()]
            } else {
                counts.iter().map(|x| (x - min) / (max - min)).collect()
            };
            mean(&scaled)
        })
        .collect();
    100.0 * mean(&per_activity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Activity, ActivitySessions, Block, Enrollment, EnrollmentCriteria, Frequency, Gender,
        Group, House, HouseRule, Priority, Session, TimeSlot,
    };
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::BTreeSet;

    fn slot(d: u32, start: u32, end: u32) -> TimeSlot {
        TimeSlot::new(
            NaiveDate::from_ymd_opt(2015, 10, d).unwrap(),
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        )
    }

    fn student(i: usize) -> Student {
        Student::new(format!("F{i}"), format!("L{i}"), Gender::Female, 22, "Medicine")
    }

    fn schedule_of(
        students: Vec<Student>,
        entries: Vec<ActivitySessions>,
    ) -> BlockSchedule {
        let block = Block::new(
            "clinical-year",
            "block-1",
            NaiveDate::from_ymd_opt(2015, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2015, 10, 31).unwrap(),
            House::new(vec![Group::new("m1", students)]),
            entries.iter().map(|e| e.activity.clone()).collect(),
        );
        BlockSchedule::new(block, entries)
    }

    fn capped(name: &str, cap: usize, rule: HouseRule) -> Activity {
        Activity::new(
            name,
            Frequency::Once(slot(27, 13, 15)),
            Priority::Neutral,
            EnrollmentCriteria::SelectMaxStudents { cap, rule },
        )
    }

    fn enrolled_session(pool: &[Student], members: &[Student]) -> Session {
        let set: BTreeSet<Student> = members.iter().cloned().collect();
        let session = Session::new(slot(27, 13, 15), pool.to_vec());
        if set.is_empty() {
            session
        } else {
            session.with_enrollment(Enrollment::Students(set))
        }
    }

    #[test]
    fn test_everyone_satisfied_scores_100() {
        let pool: Vec<Student> = (0..4).map(student).collect();
        let activity = capped("clinic", 4, HouseRule::AttendOnceThisYear);
        let session = enrolled_session(&pool, &pool);
        let schedule = schedule_of(pool, vec![ActivitySessions::new(activity, vec![session])]);

        let score = ScheduleScore::calculate(&schedule, &AttendanceRecord::new());
        assert_eq!(score.student, 100.0);
    }

    #[test]
    fn test_prior_attendance_counts_as_satisfied() {
        let pool: Vec<Student> = (0..2).map(student).collect();
        let activity = capped("clinic", 2, HouseRule::AttendOnceThisYear);
        // Nobody enrolled this block.
        let session = enrolled_session(&pool, &[]);
        let schedule =
            schedule_of(pool.clone(), vec![ActivitySessions::new(activity, vec![session])]);

        let mut attendance = AttendanceRecord::new();
        for s in &pool {
            attendance.record(s.clone(), "clinic", NaiveDate::from_ymd_opt(2015, 9, 1).unwrap());
        }
        let score = ScheduleScore::calculate(&schedule, &attendance);
        assert_eq!(score.student, 100.0);
    }

    #[test]
    fn test_uneven_coverage_is_penalized() {
        let pool: Vec<Student> = (0..2).map(student).collect();
        let activity = capped("clinic", 2, HouseRule::AttendOnceThisYear);
        // Only the first student enrolled.
        let session = enrolled_session(&pool, &pool[..1]);
        let schedule = schedule_of(pool, vec![ActivitySessions::new(activity, vec![session])]);

        let score = ScheduleScore::calculate(&schedule, &AttendanceRecord::new());
        // Completions 100 and 0: mean 50, stddev 50.
        assert_eq!(score.student, 0.0);
    }

    #[test]
    fn test_empty_session_scores_full() {
        let pool: Vec<Student> = (0..4).map(student).collect();
        let activity = capped("clinic", 4, HouseRule::AttendOnceThisYear);
        let session = enrolled_session(&pool, &[]);
        let schedule = schedule_of(pool, vec![ActivitySessions::new(activity, vec![session])]);

        let score = ScheduleScore::calculate(&schedule, &AttendanceRecord::new());
        assert_eq!(score.fullness, 100.0);
    }

    #[test]
    fn test_half_full_session() {
        let pool: Vec<Student> = (0..4).map(student).collect();
        let activity = capped("clinic", 4, HouseRule::AttendEverySession);
        let session = enrolled_session(&pool, &pool[..2]);
        let schedule = schedule_of(pool, vec![ActivitySessions::new(activity, vec![session])]);

        let score = ScheduleScore::calculate(&schedule, &AttendanceRecord::new());
        assert_eq!(score.fullness, 50.0);
    }

    #[test]
    fn test_peer_capacity_is_two() {
        use crate::models::PeerPair;

        let pool: Vec<Student> = (0..4).map(student).collect();
        let activity = Activity::new(
            "peer-exam",
            Frequency::Once(slot(27, 13, 15)),
            Priority::High,
            EnrollmentCriteria::SelectTwoPeers { times_per_block: 1 },
        );
        let pair = PeerPair::new(pool[0].clone(), pool[1].clone()).unwrap();
        let session = Session::new(slot(27, 13, 15), pool.clone())
            .with_enrollment(Enrollment::Peers(pair));
        let schedule = schedule_of(pool, vec![ActivitySessions::new(activity, vec![session])]);

        let score = ScheduleScore::calculate(&schedule, &AttendanceRecord::new());
        assert_eq!(score.fullness, 100.0);
    }

    #[test]
    fn test_distribution_counts_distinct_students() {
        let pool: Vec<Student> = (0..4).map(student).collect();
        let activity = capped("clinic", 2, HouseRule::AttendEverySession);
        let s1 = enrolled_session(&pool, &pool[..2]);
        let schedule = schedule_of(pool, vec![ActivitySessions::new(activity, vec![s1])]);

        let score = ScheduleScore::calculate(&schedule, &AttendanceRecord::new());
        assert_eq!(score.distribution, 50.0);
    }

    #[test]
    fn test_diversity_uniform_counts_score_100() {
        let pool: Vec<Student> = (0..3).map(student).collect();
        let activity = capped("clinic", 3, HouseRule::AttendEverySession);
        let session = enrolled_session(&pool, &pool);
        let schedule = schedule_of(pool, vec![ActivitySessions::new(activity, vec![session])]);

        let score = ScheduleScore::calculate(&schedule, &AttendanceRecord::new());
        assert_eq!(score.diversity, 100.0);
    }

    #[test]
    fn test_overall_averages_student_and_activities() {
        let score = ScheduleScore {
            student: 80.0,
            fullness: 90.0,
            distribution: 60.0,
            diversity: 30.0,
        };
        assert_eq!(score.activities(), 60.0);
        assert_eq!(score.overall(), 70.0);
    }

    #[test]
    fn test_overflow_sessions_excluded_from_fullness() {
        let pool: Vec<Student> = (0..4).map(student).collect();
        let master = capped("clinic", 4, HouseRule::AttendEverySession);
        let shadow = Activity::new(
            "self-study",
            Frequency::Once(slot(27, 13, 15)),
            Priority::Lowest,
            EnrollmentCriteria::OverflowFrom {
                master: "clinic".into(),
            },
        );
        let full = enrolled_session(&pool, &pool);
        // A lone straggler in overflow would score 25% if counted.
        let sparse = enrolled_session(&pool, &pool[..1]);
        let schedule = schedule_of(
            pool,
            vec![
                ActivitySessions::new(master, vec![full]),
                ActivitySessions::new(shadow, vec![sparse]),
            ],
        );

        let score = ScheduleScore::calculate(&schedule, &AttendanceRecord::new());
        assert_eq!(score.fullness, 100.0);
    }
}
