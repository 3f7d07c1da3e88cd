//! The shared per-session filler.
//!
//! All three unordered enrollers fill one session the same way; they only
//! differ in the order sessions are visited. The filler never overwrites
//! an existing enrollment, never partially fills a peer session, and never
//! enrolls a student into two sessions whose time windows strictly
//! intersect on the same date.

use rand::Rng;
use std::collections::BTreeSet;

use crate::models::{
    Activity, AttendanceRecord, Enrollment, EnrollmentCriteria, PeerPair, Session, Student,
};
use crate::random::shuffled;
use crate::scheduler::predicates::{needs_bedside, needs_peer, students_needing};

/// Fills a single session of an unordered activity.
///
/// `overlap_context` is every enrolled session of the block that could
/// conflict with this one (filled earlier in the pass, or carried over
/// from a partial schedule); `activity_scheduled` is this activity's
/// already-filled sessions, driving the need predicates. Returns a
/// modified copy; the input is never mutated.
pub(crate) fn fill_session<R: Rng>(
    session: &Session,
    activity: &Activity,
    overlap_context: &[&Session],
    activity_scheduled: &[Session],
    attendance: &AttendanceRecord,
    rng: &mut R,
) -> Session {
    let overlapping: Vec<&Session> = overlap_context
        .iter()
        .filter(|s| s.id != session.id && s.slot.overlaps(&session.slot))
        .copied()
        .collect();
    let can_enroll =
        |student: &Student| !overlapping.iter().any(|s| s.enrollment.contains(student));

    match &activity.criteria {
        EnrollmentCriteria::SelectTwoPeers { times_per_block } => {
            if !session.enrollment.is_empty() {
                return session.clone();
            }
            let bedside_candidates: Vec<Student> = session
                .enrollable
                .iter()
                .filter(|s| needs_bedside(s, activity_scheduled, *times_per_block))
                .filter(|s| can_enroll(s))
                .cloned()
                .collect();
            let peer_candidates: Vec<Student> = session
                .enrollable
                .iter()
                .filter(|s| needs_peer(s, activity_scheduled, *times_per_block))
                .filter(|s| can_enroll(s))
                .cloned()
                .collect();

            let bedside_candidates = shuffled(rng, &bedside_candidates);
            let peer_candidates = shuffled(rng, &peer_candidates);

            // A session gets a full pair or nothing.
            let pair = bedside_candidates.first().and_then(|bedside| {
                peer_candidates
                    .iter()
                    .find(|peer| *peer != bedside)
                    .and_then(|peer| PeerPair::new(bedside.clone(), peer.clone()))
            });
            match pair {
                Some(pair) => session.with_enrollment(Enrollment::Peers(pair)),
                None => session.clone(),
            }
        }
        EnrollmentCriteria::SelectMaxStudents { cap, .. } => {
            let mut enrolled: BTreeSet<Student> = session
                .enrollment
                .students()
                .into_iter()
                .cloned()
                .collect();
            if enrolled.len() >= *cap {
                return session.clone();
            }

            let needing =
                students_needing(activity, &session.enrollable, attendance, activity_scheduled);
            let candidates: Vec<Student> = needing
                .into_iter()
                .filter(|s| !enrolled.contains(s))
                .filter(|s| can_enroll(s))
                .collect();
            let picked = shuffled(rng, &candidates);
            enrolled.extend(picked.into_iter().take(cap - enrolled.len()));

            if enrolled.is_empty() {
                session.clone()
            } else {
                session.with_enrollment(Enrollment::Students(enrolled))
            }
        }
        // Mandatory and overflow activities have dedicated passes; the
        // enroll driver rejects them before this point.
        EnrollmentCriteria::SelectAllStudents { .. }
        | EnrollmentCriteria::OverflowFrom { .. } => session.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Gender, HouseRule, Priority, TimeSlot};
    use crate::random::create_rng;
    use chrono::{NaiveDate, NaiveTime};

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

    fn students(n: usize) -> Vec<Student> {
        (0..n).map(student).collect()
    }

    fn peer_activity(times: u32) -> Activity {
        Activity::new(
            "peer-exam",
            Frequency::Once(slot(27, 13, 15)),
            Priority::High,
            EnrollmentCriteria::SelectTwoPeers { times_per_block: times },
        )
    }

    fn capped_activity(cap: usize) -> Activity {
        Activity::new(
            "clinic",
            Frequency::Once(slot(27, 13, 15)),
            Priority::Neutral,
            EnrollmentCriteria::SelectMaxStudents {
                cap,
                rule: HouseRule::AttendEverySession,
            },
        )
    }

    #[test]
    fn test_peer_fill_produces_distinct_pair_from_enrollable() {
        let mut rng = create_rng(3);
        let pool = students(4);
        let session = Session::new(slot(27, 13, 15), pool.clone());
        let filled = fill_session(&session, &peer_activity(1), &[], &[], &AttendanceRecord::new(), &mut rng);

        match &filled.enrollment {
            Enrollment::Peers(pair) => {
                assert_ne!(pair.bedside, pair.peer);
                assert!(pool.contains(&pair.bedside));
                assert!(pool.contains(&pair.peer));
            }
            other => panic!("expected a peer pair, got {other:?}"),
        }
    }

    #[test]
    fn test_peer_fill_starved_session_stays_empty() {
        let mut rng = create_rng(3);
        // One student cannot hold both roles.
        let session = Session::new(slot(27, 13, 15), students(1));
        let filled = fill_session(&session, &peer_activity(1), &[], &[], &AttendanceRecord::new(), &mut rng);
        assert!(filled.enrollment.is_empty(), "never partially fill a peer session");
    }

    #[test]
    fn test_peer_fill_respects_role_saturation() {
        let mut rng = create_rng(3);
        let pool = students(2);
        let pair = PeerPair::new(pool[0].clone(), pool[1].clone()).unwrap();
        let done = Session::new(slot(20, 13, 15), pool.clone())
            .with_enrollment(Enrollment::Peers(pair));

        // Both students already used their single bedside/peer round, in
        // opposite roles; only the swapped pair remains needed.
        let session = Session::new(slot(27, 13, 15), pool.clone());
        let filled =
            fill_session(&session, &peer_activity(1), &[], &[done], &AttendanceRecord::new(), &mut rng);
        match &filled.enrollment {
            Enrollment::Peers(pair) => {
                assert_eq!(pair.bedside, pool[1]);
                assert_eq!(pair.peer, pool[0]);
            }
            other => panic!("expected swapped pair, got {other:?}"),
        }
    }

    #[test]
    fn test_capped_fill_honors_cap() {
        let mut rng = create_rng(5);
        let session = Session::new(slot(27, 13, 15), students(10));
        let filled =
            fill_session(&session, &capped_activity(3), &[], &[], &AttendanceRecord::new(), &mut rng);
        assert_eq!(filled.enrollment.len(), 3);
    }

    #[test]
    fn test_capped_fill_tops_up_partial_enrollment() {
        let mut rng = create_rng(5);
        let pool = students(10);
        let mut existing = BTreeSet::new();
        existing.insert(pool[0].clone());
        let session = Session::new(slot(27, 13, 15), pool.clone())
            .with_enrollment(Enrollment::Students(existing));

        let filled =
            fill_session(&session, &capped_activity(3), &[], &[], &AttendanceRecord::new(), &mut rng);
        assert_eq!(filled.enrollment.len(), 3);
        assert!(filled.enrollment.contains(&pool[0]), "existing members preserved");
    }

    #[test]
    fn test_capped_fill_skips_conflicting_students() {
        let mut rng = create_rng(5);
        let pool = students(3);
        let mut busy = BTreeSet::new();
        busy.insert(pool[0].clone());
        busy.insert(pool[1].clone());
        // Overlapping window 14-16 on the same date.
        let other = Session::new(slot(27, 14, 16), pool.clone())
            .with_enrollment(Enrollment::Students(busy));

        let session = Session::new(slot(27, 13, 15), pool.clone());
        let filled = fill_session(
            &session,
            &capped_activity(3),
            &[&other],
            &[],
            &AttendanceRecord::new(),
            &mut rng,
        );
        assert_eq!(filled.enrollment.len(), 1);
        assert!(filled.enrollment.contains(&pool[2]));
    }

    #[test]
    fn test_full_session_is_untouched() {
        let mut rng = create_rng(5);
        let pool = students(5);
        let full: BTreeSet<Student> = pool[..2].iter().cloned().collect();
        let session = Session::new(slot(27, 13, 15), pool)
            .with_enrollment(Enrollment::Students(full.clone()));
        let filled =
            fill_session(&session, &capped_activity(2), &[], &[], &AttendanceRecord::new(), &mut rng);
        assert_eq!(filled.enrollment, Enrollment::Students(full));
    }

    #[test]
    fn test_once_this_year_satisfied_leaves_session_empty() {
        let mut rng = create_rng(5);
        let pool = students(2);
        let activity = Activity::new(
            "clinic",
            Frequency::Once(slot(27, 13, 15)),
            Priority::Neutral,
            EnrollmentCriteria::SelectMaxStudents {
                cap: 4,
                rule: HouseRule::AttendOnceThisYear,
            },
        );
        let mut attendance = AttendanceRecord::new();
        for s in &pool {
            attendance.record(s.clone(), "clinic", NaiveDate::from_ymd_opt(2015, 9, 1).unwrap());
        }

        let session = Session::new(slot(27, 13, 15), pool);
        let filled = fill_session(&session, &activity, &[], &[], &attendance, &mut rng);
        assert!(filled.enrollment.is_empty());
    }
}
