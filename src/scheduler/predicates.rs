//! Enrollment need predicates.
//!
//! Given attendance history and the sessions already scheduled this block,
//! these predicates answer which students still require an activity. The
//! constructive fillers use them to avoid enrolling students whose
//! obligation is already met.

use crate::models::{
    Activity, AttendanceRecord, AttendanceRequirement, Enrollment, Session, Student,
};

/// Students from `enrollable` who still need the activity.
///
/// - `AttendEverySession`: everyone, always.
/// - `AttendOnceThisYear`: those with neither a prior-block attendance of
///   the activity nor an enrollment in an already-scheduled session of it.
/// - `SelectTwoPeers`: those still short on either role.
/// - Overflow: nobody; overflow is not scheduled constructively.
pub fn students_needing(
    activity: &Activity,
    enrollable: &[Student],
    attendance: &AttendanceRecord,
    scheduled: &[Session],
) -> Vec<Student> {
    match activity.requirement() {
        AttendanceRequirement::EverySession => enrollable.to_vec(),
        AttendanceRequirement::OnceThisYear => enrollable
            .iter()
            .filter(|s| {
                !attendance.has_attended(s, &activity.name)
                    && !scheduled.iter().any(|sess| sess.enrollment.contains(s))
            })
            .cloned()
            .collect(),
        AttendanceRequirement::PeerRoles { times_per_block } => enrollable
            .iter()
            .filter(|s| {
                needs_bedside(s, scheduled, times_per_block)
                    || needs_peer(s, scheduled, times_per_block)
            })
            .cloned()
            .collect(),
        AttendanceRequirement::NoRequirement => Vec::new(),
    }
}

/// Whether the student has fewer than `times_per_block` bedside
/// assignments across the scheduled sessions.
pub fn needs_bedside(student: &Student, scheduled: &[Session], times_per_block: u32) -> bool {
    (bedside_count(student, scheduled) as u32) < times_per_block
}

/// Whether the student has fewer than `times_per_block` peer assignments
/// across the scheduled sessions.
pub fn needs_peer(student: &Student, scheduled: &[Session], times_per_block: u32) -> bool {
    (peer_count(student, scheduled) as u32) < times_per_block
}

/// Number of sessions in which the student holds the bedside role.
pub fn bedside_count(student: &Student, sessions: &[Session]) -> usize {
    sessions
        .iter()
        .filter(|s| matches!(&s.enrollment, Enrollment::Peers(pair) if &pair.bedside == student))
        .count()
}

/// Number of sessions in which the student holds the peer role.
pub fn peer_count(student: &Student, sessions: &[Session]) -> usize {
    sessions
        .iter()
        .filter(|s| matches!(&s.enrollment, Enrollment::Peers(pair) if &pair.peer == student))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EnrollmentCriteria, Frequency, Gender, HouseRule, PeerPair, Priority, TimeSlot,
    };
    use chrono::{NaiveDate, NaiveTime};

    fn slot(d: u32, start: u32, end: u32) -> TimeSlot {
        TimeSlot::new(
            NaiveDate::from_ymd_opt(2015, 10, d).unwrap(),
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        )
    }

    fn student(first: &str, last: &str) -> Student {
        Student::new(first, last, Gender::Male, 23, "Medicine")
    }

    fn once_activity(name: &str, rule: HouseRule) -> Activity {
        Activity::new(
            name,
            Frequency::Once(slot(27, 13, 15)),
            Priority::Neutral,
            EnrollmentCriteria::SelectMaxStudents { cap: 4, rule },
        )
    }

    #[test]
    fn test_every_session_needs_everyone() {
        let activity = once_activity("rounds", HouseRule::AttendEverySession);
        let students = vec![student("Ada", "Lovelace"), student("Grace", "Hopper")];
        let needing = students_needing(&activity, &students, &AttendanceRecord::new(), &[]);
        assert_eq!(needing, students);
    }

    #[test]
    fn test_once_this_year_excludes_prior_attendance() {
        let activity = once_activity("rounds", HouseRule::AttendOnceThisYear);
        let ada = student("Ada", "Lovelace");
        let grace = student("Grace", "Hopper");

        let mut attendance = AttendanceRecord::new();
        attendance.record(ada.clone(), "rounds", NaiveDate::from_ymd_opt(2015, 9, 1).unwrap());

        let needing = students_needing(
            &activity,
            &[ada, grace.clone()],
            &attendance,
            &[],
        );
        assert_eq!(needing, vec![grace]);
    }

    #[test]
    fn test_once_this_year_excludes_this_block_enrollment() {
        let activity = once_activity("rounds", HouseRule::AttendOnceThisYear);
        let ada = student("Ada", "Lovelace");
        let grace = student("Grace", "Hopper");

        let scheduled = Session::new(slot(20, 13, 15), vec![ada.clone(), grace.clone()])
            .with_enrollment(Enrollment::Student(ada.clone()));

        let needing = students_needing(
            &activity,
            &[ada, grace.clone()],
            &AttendanceRecord::new(),
            &[scheduled],
        );
        assert_eq!(needing, vec![grace]);
    }

    #[test]
    fn test_peer_role_counting() {
        let ada = student("Ada", "Lovelace");
        let grace = student("Grace", "Hopper");
        let pair = PeerPair::new(ada.clone(), grace.clone()).unwrap();
        let scheduled = vec![
            Session::new(slot(20, 13, 15), vec![ada.clone(), grace.clone()])
                .with_enrollment(Enrollment::Peers(pair)),
        ];

        assert_eq!(bedside_count(&ada, &scheduled), 1);
        assert_eq!(peer_count(&ada, &scheduled), 0);
        assert!(!needs_bedside(&ada, &scheduled, 1));
        assert!(needs_peer(&ada, &scheduled, 1));
        assert!(needs_bedside(&grace, &scheduled, 1));
        assert!(!needs_peer(&grace, &scheduled, 1));
    }

    #[test]
    fn test_overflow_needs_nobody() {
        let activity = Activity::new(
            "self-study",
            Frequency::Once(slot(27, 13, 15)),
            Priority::Lowest,
            EnrollmentCriteria::OverflowFrom {
                master: "rounds".into(),
            },
        );
        let needing = students_needing(
            &activity,
            &[student("Ada", "Lovelace")],
            &AttendanceRecord::new(),
            &[],
        );
        assert!(needing.is_empty());
    }
}
