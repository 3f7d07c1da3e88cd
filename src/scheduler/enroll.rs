//! Constructive enrollment.
//!
//! Three passes build a full schedule:
//!
//! 1. **Mandatory**: every empty mandatory session receives the whole house.
//! 2. **Unordered**: an [`EnrollStrategy`] visits the unordered sessions in
//!    a priority-driven order and fills each through the shared per-session
//!    filler.
//! 3. **Overflow**: runs last; each overflow session receives the
//!    complement of its master session's enrollment, minus students busy in
//!    any other overlapping session.
//!
//! All passes are correct irrespective of starting state: sessions already
//! populated are preserved and only empty slots are filled, which is what
//! lets the genetic operators reuse [`fill_schedule`] as their repair step.

use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::BlockplanError;
use crate::models::{
    Activity, ActivitySessions, AttendanceRecord, Block, BlockSchedule, Enrollment, House,
    Priority, Session, Student,
};
use crate::scheduler::filler::fill_session;
use crate::scheduler::sessions::{SessionBands, create_sessions};

/// Visit order for unordered sessions.
///
/// All strategies fill sessions through the same per-session filler and
/// honor enrollment priority (`Highest` first); they differ only in how
/// ties are broken and whether activities are interleaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollStrategy {
    /// Interleave sessions across activities; ties broken uniformly at
    /// random. The default for genetic construction.
    Random,
    /// Interleave sessions across activities; ties broken by date and
    /// start time.
    BySessionTime,
    /// Fill all sessions of one activity before moving to the next;
    /// activity ties broken at random, sessions kept in their given order.
    ByActivity,
}

impl EnrollStrategy {
    /// Fills the unordered band.
    ///
    /// # Errors
    /// Fails when the band contains a mandatory or overflow activity;
    /// those have dedicated passes and must never reach this enroller.
    pub fn enroll<R: Rng>(
        &self,
        unordered: Vec<ActivitySessions>,
        attendance: &AttendanceRecord,
        rng: &mut R,
    ) -> Result<Vec<ActivitySessions>, BlockplanError> {
        for entry in &unordered {
            if !entry.activity.is_unordered() {
                return Err(BlockplanError::NotSchedulable(entry.activity.name.clone()));
            }
        }

        let activities: Vec<Activity> =
            unordered.iter().map(|e| e.activity.clone()).collect();
        let session_lists: Vec<Vec<Session>> =
            unordered.into_iter().map(|e| e.sessions).collect();

        let order = self.visit_order(&activities, session_lists, rng);
        debug!(strategy = ?self, sessions = order.len(), "unordered enroll pass");

        // Fold: each filled session becomes context for subsequent fills.
        // Pre-filled sessions not yet visited also count as conflict
        // context, so repairing a partial schedule never double-books a
        // student against an enrollment it has not reached yet.
        let mut pending: Vec<(usize, Session)> = order
            .iter()
            .filter(|(_, s)| !s.enrollment.is_empty())
            .cloned()
            .collect();
        let mut all_filled: Vec<Session> = Vec::new();
        let mut per_activity: Vec<Vec<Session>> = vec![Vec::new(); activities.len()];
        for (idx, session) in order {
            if let Some(at) = pending
                .iter()
                .position(|(i, p)| *i == idx && p.id == session.id)
            {
                pending.remove(at);
            }
            let context: Vec<&Session> = all_filled
                .iter()
                .chain(pending.iter().map(|(_, s)| s))
                .collect();
            let filled = fill_session(
                &session,
                &activities[idx],
                &context,
                &per_activity[idx],
                attendance,
                rng,
            );
            all_filled.push(filled.clone());
            per_activity[idx].push(filled);
        }

        let mut out = Vec::with_capacity(activities.len());
        for (idx, activity) in activities.into_iter().enumerate() {
            let mut sessions = std::mem::take(&mut per_activity[idx]);
            if *self != EnrollStrategy::ByActivity {
                // Deterministic output shape for the interleaving strategies.
                sessions.sort_by(|a, b| {
                    (b.slot.date, b.slot.start).cmp(&(a.slot.date, a.slot.start))
                });
            }
            out.push(ActivitySessions::new(activity, sessions));
        }
        Ok(out)
    }

    /// The `(activity index, session)` visit order for this strategy.
    fn visit_order<R: Rng>(
        &self,
        activities: &[Activity],
        session_lists: Vec<Vec<Session>>,
        rng: &mut R,
    ) -> Vec<(usize, Session)> {
        match self {
            EnrollStrategy::Random => {
                let mut keyed: Vec<((Priority, u64), usize, Session)> = session_lists
                    .into_iter()
                    .enumerate()
                    .flat_map(|(idx, sessions)| {
                        sessions.into_iter().map(move |s| (idx, s))
                    })
                    .map(|(idx, s)| ((activities[idx].priority, rng.random()), idx, s))
                    .collect();
                keyed.sort_by_key(|(key, _, _)| *key);
                keyed.into_iter().map(|(_, idx, s)| (idx, s)).collect()
            }
            EnrollStrategy::BySessionTime => {
                let mut flat: Vec<(usize, Session)> = session_lists
                    .into_iter()
                    .enumerate()
                    .flat_map(|(idx, sessions)| {
                        sessions.into_iter().map(move |s| (idx, s))
                    })
                    .collect();
                flat.sort_by_key(|(idx, s)| {
                    (activities[*idx].priority, s.slot.date, s.slot.start)
                });
                flat
            }
            EnrollStrategy::ByActivity => {
                let mut act_order: Vec<(Priority, u64, usize)> = (0..activities.len())
                    .map(|idx| (activities[idx].priority, rng.random(), idx))
                    .collect();
                act_order.sort();
                let mut session_lists: Vec<Option<Vec<Session>>> =
                    session_lists.into_iter().map(Some).collect();
                act_order
                    .into_iter()
                    .flat_map(|(_, _, idx)| {
                        session_lists[idx]
                            .take()
                            .expect("each activity visited once")
                            .into_iter()
                            .map(move |s| (idx, s))
                    })
                    .collect()
            }
        }
    }
}

/// Fills every empty mandatory session with the entire house.
pub fn enroll_mandatory(
    mandatory: Vec<ActivitySessions>,
    house: &House,
) -> Vec<ActivitySessions> {
    mandatory
        .into_iter()
        .map(|entry| {
            let sessions = entry
                .sessions
                .into_iter()
                .map(|s| {
                    if s.enrollment.is_empty() {
                        s.with_enrollment(Enrollment::Groups(house.groups.clone()))
                    } else {
                        s
                    }
                })
                .collect();
            ActivitySessions::new(entry.activity, sessions)
        })
        .collect()
}

/// Fills the overflow band from the already-enrolled rest of the block.
///
/// For each overflow session the matching master session is the one with
/// the identical time slot; enrollment becomes the enrollable students not
/// in the master session and not busy in any other overlapping session.
/// Overflow entries fill sequentially, so two overflow activities sharing
/// a slot never double-book a student.
pub fn enroll_overflow(
    overflow: Vec<ActivitySessions>,
    enrolled: &[ActivitySessions],
) -> Vec<ActivitySessions> {
    let mut context: Vec<ActivitySessions> = enrolled.to_vec();
    let mut out = Vec::with_capacity(overflow.len());

    for entry in overflow {
        let master_name = match &entry.activity.criteria {
            crate::models::EnrollmentCriteria::OverflowFrom { master } => master.clone(),
            _ => {
                out.push(entry);
                continue;
            }
        };
        let sessions: Vec<Session> = entry
            .sessions
            .iter()
            .map(|session| {
                let master_session = context
                    .iter()
                    .find(|e| e.activity.name == master_name)
                    .and_then(|e| e.sessions.iter().find(|m| m.slot == session.slot));

                let complement: BTreeSet<Student> = session
                    .enrollable
                    .iter()
                    .filter(|s| !master_session.is_some_and(|m| m.enrollment.contains(s)))
                    .filter(|s| {
                        !busy_elsewhere(s, session, &master_name, master_session, &context)
                    })
                    .cloned()
                    .collect();

                if complement.is_empty() {
                    session.clone()
                } else {
                    session.with_enrollment(Enrollment::Students(complement))
                }
            })
            .collect();
        let filled = ActivitySessions::new(entry.activity, sessions);
        context.push(filled.clone());
        out.push(filled);
    }
    out
}

/// Whether the student is enrolled in any session overlapping `session`,
/// other than the master session itself.
fn busy_elsewhere(
    student: &Student,
    session: &Session,
    master_name: &str,
    master_session: Option<&Session>,
    context: &[ActivitySessions],
) -> bool {
    context.iter().any(|entry| {
        entry.sessions.iter().any(|other| {
            let is_master = entry.activity.name == master_name
                && master_session.is_some_and(|m| m.id == other.id);
            !is_master
                && other.slot.overlaps(&session.slot)
                && other.enrollment.contains(student)
        })
    })
}

/// Builds a fully enrolled schedule for a block in one constructive pass.
///
/// # Errors
/// Fails on the configuration faults detected by session generation.
pub fn create_schedule<R: Rng>(
    block: &Block,
    attendance: &AttendanceRecord,
    strategy: EnrollStrategy,
    rng: &mut R,
) -> Result<BlockSchedule, BlockplanError> {
    let bands = create_sessions(block)?;
    compose_schedule(block, bands, attendance, strategy, rng)
}

/// Repairs a partial schedule.
///
/// Existing enrollments in the mandatory and unordered bands are kept;
/// empty slots are filled; the overflow band is regenerated from scratch
/// and the mandatory band reasserted.
pub fn fill_schedule<R: Rng>(
    schedule: &BlockSchedule,
    attendance: &AttendanceRecord,
    strategy: EnrollStrategy,
    rng: &mut R,
) -> Result<BlockSchedule, BlockplanError> {
    let mut bands = SessionBands {
        mandatory: Vec::new(),
        unordered: Vec::new(),
        overflow: Vec::new(),
    };
    for entry in &schedule.activity_sessions {
        if entry.activity.is_mandatory() {
            bands.mandatory.push(entry.clone());
        } else if entry.activity.is_overflow() {
            // Overflow is derived state; always recomputed.
            let cleared = entry
                .sessions
                .iter()
                .map(|s| s.with_enrollment(Enrollment::Empty))
                .collect();
            bands
                .overflow
                .push(ActivitySessions::new(entry.activity.clone(), cleared));
        } else {
            bands.unordered.push(entry.clone());
        }
    }
    compose_schedule(&schedule.block, bands, attendance, strategy, rng)
}

/// Runs the three passes over pre-materialized bands and assembles the
/// schedule in block activity order.
fn compose_schedule<R: Rng>(
    block: &Block,
    bands: SessionBands,
    attendance: &AttendanceRecord,
    strategy: EnrollStrategy,
    rng: &mut R,
) -> Result<BlockSchedule, BlockplanError> {
    let mandatory = enroll_mandatory(bands.mandatory, &block.house);
    let unordered = strategy.enroll(bands.unordered, attendance, rng)?;

    let mut enrolled: Vec<ActivitySessions> = mandatory;
    enrolled.extend(unordered);
    let overflow = enroll_overflow(bands.overflow, &enrolled);
    enrolled.extend(overflow);

    enrolled.sort_by_key(|entry| {
        block
            .activities
            .iter()
            .position(|a| a.name == entry.activity.name)
            .unwrap_or(usize::MAX)
    });
    Ok(BlockSchedule::new(block.clone(), enrolled))
}
