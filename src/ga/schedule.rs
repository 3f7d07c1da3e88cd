//! Genetic search over block schedules.
//!
//! Individuals are fully enrolled [`BlockSchedule`]s. Construction and
//! repair reuse the constructive enrollers; crossover merges the session
//! grids of two parents and repairs the result, so every individual in
//! every generation is a legal schedule.
//!
//! # Crossover
//!
//! Flatten both parents into `(activity, session)` lists, borrow a random
//! subset from the first parent, then take every second-parent session not
//! colliding with that subset. Borrowed sessions are *fixed up*: students
//! who now conflict with the subset, or who exceed the activity's
//! requirement inside the subset, are dropped. The repair pass then tops
//! up the gaps, regenerates the overflow band, and reasserts the
//! mandatory band.

use rand::Rng;
use rand::seq::index::sample;
use std::collections::{BTreeSet, HashSet};

use super::types::{GaProblem, Individual};
use crate::error::BlockplanError;
use crate::models::{
    Activity, ActivitySessions, AttendanceRecord, AttendanceRequirement, Block, BlockSchedule,
    Enrollment, Session, Student,
};
use crate::random::uniform_inclusive;
use crate::scheduler::predicates::{bedside_count, peer_count};
use crate::scheduler::{EnrollStrategy, create_sessions, fill_schedule};

/// A block schedule with its cached fitness.
#[derive(Debug, Clone)]
pub struct ScheduleIndividual {
    /// The candidate schedule.
    pub schedule: BlockSchedule,
    fitness: f64,
}

impl Individual for ScheduleIndividual {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// GA problem over block schedules.
pub struct ScheduleProblem<'a> {
    block: &'a Block,
    attendance: &'a AttendanceRecord,
    strategy: EnrollStrategy,
    empty_schedule: BlockSchedule,
}

impl<'a> ScheduleProblem<'a> {
    /// Creates the problem, materializing the session grid once.
    ///
    /// # Errors
    /// Fails on the configuration faults detected by session generation.
    pub fn new(block: &'a Block, attendance: &'a AttendanceRecord) -> Result<Self, BlockplanError> {
        let bands = create_sessions(block)?;
        let mut entries: Vec<ActivitySessions> = Vec::with_capacity(block.activities.len());
        entries.extend(bands.mandatory);
        entries.extend(bands.unordered);
        entries.extend(bands.overflow);
        entries.sort_by_key(|entry| {
            block
                .activities
                .iter()
                .position(|a| a.name == entry.activity.name)
                .unwrap_or(usize::MAX)
        });
        Ok(Self {
            block,
            attendance,
            strategy: EnrollStrategy::Random,
            empty_schedule: BlockSchedule::new(block.clone(), entries),
        })
    }

    /// Overrides the enrollment strategy used for construction and repair.
    pub fn with_strategy(mut self, strategy: EnrollStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Runs the constructive enroller over a (possibly partial) schedule.
    fn repair<R: Rng>(&self, schedule: &BlockSchedule, rng: &mut R) -> BlockSchedule {
        fill_schedule(schedule, self.attendance, self.strategy, rng)
            .expect("bands were validated when the problem was created")
    }

    /// One-directional merge of two parents; the repair pass follows.
    fn merge<R: Rng>(&self, first: &BlockSchedule, second: &BlockSchedule, rng: &mut R) -> BlockSchedule {
        let flat_first: Vec<(&Activity, &Session)> = first.all_sessions().collect();
        if flat_first.is_empty() {
            return first.clone();
        }

        let keep = uniform_inclusive(rng, 1, flat_first.len());
        let subset: Vec<(Activity, Session)> = sample(rng, flat_first.len(), keep)
            .into_iter()
            .map(|i| (flat_first[i].0.clone(), flat_first[i].1.clone()))
            .collect();
        let taken: HashSet<(&str, u64)> = subset
            .iter()
            .map(|(a, s)| (a.name.as_str(), s.id))
            .collect();

        let mut merged: Vec<(Activity, Session)> = subset.clone();
        for (activity, session) in second.all_sessions() {
            if taken.contains(&(activity.name.as_str(), session.id)) {
                continue;
            }
            merged.push((activity.clone(), fix_up(session, activity, &subset)));
        }

        // Regroup by activity, preserving block activity order.
        let mut entries: Vec<ActivitySessions> = self
            .block
            .activities
            .iter()
            .map(|a| ActivitySessions::new(a.clone(), Vec::new()))
            .collect();
        for (activity, session) in merged {
            if let Some(entry) = entries.iter_mut().find(|e| e.activity == activity) {
                entry.sessions.push(session);
            }
        }
        for entry in &mut entries {
            entry.sessions.sort_by_key(|s| s.slot);
        }

        BlockSchedule::new(self.block.clone(), entries)
    }
}

impl GaProblem for ScheduleProblem<'_> {
    type Individual = ScheduleIndividual;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> ScheduleIndividual {
        ScheduleIndividual {
            schedule: self.repair(&self.empty_schedule, rng),
            fitness: 0.0,
        }
    }

    fn evaluate(&self, individual: &ScheduleIndividual) -> f64 {
        crate::fitness::ScheduleScore::calculate(&individual.schedule, self.attendance).overall()
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &ScheduleIndividual,
        parent2: &ScheduleIndividual,
        rng: &mut R,
    ) -> (ScheduleIndividual, ScheduleIndividual) {
        let first = self.merge(&parent1.schedule, &parent2.schedule, rng);
        let second = self.merge(&parent2.schedule, &parent1.schedule, rng);
        (
            ScheduleIndividual {
                schedule: self.repair(&first, rng),
                fitness: 0.0,
            },
            ScheduleIndividual {
                schedule: self.repair(&second, rng),
                fitness: 0.0,
            },
        )
    }

    fn mutate<R: Rng>(&self, individual: &mut ScheduleIndividual, rng: &mut R) {
        let mutable: Vec<(usize, usize)> = individual
            .schedule
            .activity_sessions
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.activity.is_unordered())
            .flat_map(|(i, entry)| (0..entry.sessions.len()).map(move |j| (i, j)))
            .collect();
        if mutable.is_empty() {
            return;
        }
        let (entry_idx, session_idx) = mutable[rng.random_range(0..mutable.len())];

        individual.schedule.activity_sessions[entry_idx].sessions[session_idx].enrollment =
            Enrollment::Empty;
        for entry in &mut individual.schedule.activity_sessions {
            if entry.activity.is_overflow() {
                for session in &mut entry.sessions {
                    session.enrollment = Enrollment::Empty;
                }
            }
        }
        individual.schedule = self.repair(&individual.schedule, rng);
    }

    fn mutation_rate(&self) -> f64 {
        0.01
    }
}

/// Drops students from a borrowed session when they conflict with the
/// first parent's subset or exceed the activity's per-student requirement
/// inside it.
///
/// # Panics
/// Panics when a group-valued enrollment would have to lose a student;
/// the current operators never produce that state, so reaching it means a
/// corrupted schedule.
fn fix_up(session: &Session, activity: &Activity, subset: &[(Activity, Session)]) -> Session {
    // Mandatory sessions are identical in both parents and reasserted by
    // repair; they carry group enrollments that must never shrink.
    if activity.is_mandatory() {
        return session.clone();
    }
    let same_activity: Vec<Session> = subset
        .iter()
        .filter(|(a, _)| a == activity)
        .map(|(_, s)| s.clone())
        .collect();

    let offenders: BTreeSet<Student> = session
        .enrolled()
        .into_iter()
        .filter(|student| {
            let conflicts = subset.iter().any(|(_, other)| {
                other.id != session.id
                    && other.slot.overlaps(&session.slot)
                    && other.enrollment.contains(student)
            });
            conflicts || exceeds_requirement(student, session, activity, &same_activity)
        })
        .cloned()
        .collect();

    remove_students(session, activity, &offenders)
}

/// Whether enrolling the student here exceeds what the activity's
/// requirement allows, given their enrollments in the kept subset.
fn exceeds_requirement(
    student: &Student,
    session: &Session,
    activity: &Activity,
    same_activity: &[Session],
) -> bool {
    match activity.requirement() {
        AttendanceRequirement::OnceThisYear => same_activity
            .iter()
            .any(|s| s.enrollment.contains(student)),
        AttendanceRequirement::PeerRoles { times_per_block } => match &session.enrollment {
            Enrollment::Peers(pair) if &pair.bedside == student => {
                bedside_count(student, same_activity) as u32 >= times_per_block
            }
            Enrollment::Peers(pair) if &pair.peer == student => {
                peer_count(student, same_activity) as u32 >= times_per_block
            }
            _ => false,
        },
        // Every-session activities have no per-student limit; overflow is
        // regenerated wholesale during repair.
        AttendanceRequirement::EverySession | AttendanceRequirement::NoRequirement => false,
    }
}

/// Removes the offending students from a session's enrollment. Peer pairs
/// are all-or-nothing.
fn remove_students(session: &Session, activity: &Activity, offenders: &BTreeSet<Student>) -> Session {
    if offenders.is_empty() {
        return session.clone();
    }
    let enrollment = match &session.enrollment {
        Enrollment::Empty => Enrollment::Empty,
        Enrollment::Student(s) => {
            if offenders.contains(s) {
                Enrollment::Empty
            } else {
                Enrollment::Student(s.clone())
            }
        }
        Enrollment::Students(set) => {
            let kept: BTreeSet<Student> = set.difference(offenders).cloned().collect();
            if kept.is_empty() {
                Enrollment::Empty
            } else {
                Enrollment::Students(kept)
            }
        }
        Enrollment::Peers(pair) => {
            if offenders.contains(&pair.bedside) || offenders.contains(&pair.peer) {
                Enrollment::Empty
            } else {
                Enrollment::Peers(pair.clone())
            }
        }
        Enrollment::Groups(_) => panic!(
            "cannot remove students from a group enrollment during repair (activity '{}')",
            activity.name
        ),
    };
    session.with_enrollment(enrollment)
}
