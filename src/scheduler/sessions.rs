//! Session generation.
//!
//! Expands a block's activities into concrete session instances and
//! classifies them into three bands:
//!
//! - **mandatory** — `SelectAllStudents` activities; the whole house attends
//! - **unordered** — activities filled by the constructive enrollers
//! - **overflow** — activities mirroring a master's time grid
//!
//! Sessions of non-mandatory activities that strictly overlap a mandatory
//! session on the same date are dropped before enrollment begins, so the
//! enrollers never have to resolve that conflict.

use crate::error::BlockplanError;
use crate::models::{
    Activity, ActivitySessions, Block, EnrollmentCriteria, Session, TimeSlot,
};

/// The three disjoint session bands of a block.
///
/// Every activity of the block appears in exactly one band, determined by
/// its criteria shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionBands {
    /// `SelectAllStudents` activities.
    pub mandatory: Vec<ActivitySessions>,
    /// Activities scheduled by the constructive enrollers.
    pub unordered: Vec<ActivitySessions>,
    /// `OverflowFrom` activities.
    pub overflow: Vec<ActivitySessions>,
}

/// Materializes and classifies all sessions of a block.
///
/// # Errors
/// Fails when an overflow activity references a missing master, a master
/// with a different frequency, or another overflow activity.
pub fn create_sessions(block: &Block) -> Result<SessionBands, BlockplanError> {
    let mut all: Vec<ActivitySessions> = Vec::with_capacity(block.activities.len());
    for activity in &block.activities {
        let mut sessions = raw_sessions(activity, block)?;
        sessions.sort_by_key(|s| s.slot);
        all.push(ActivitySessions::new(activity.clone(), sessions));
    }

    // Mandatory slots win every conflict: drop overlapping sessions of
    // every other activity up front.
    let mandatory_slots: Vec<TimeSlot> = all
        .iter()
        .filter(|entry| entry.activity.is_mandatory())
        .flat_map(|entry| entry.sessions.iter().map(|s| s.slot))
        .collect();

    for entry in &mut all {
        if entry.activity.is_mandatory() {
            continue;
        }
        entry
            .sessions
            .retain(|s| !mandatory_slots.iter().any(|m| m.overlaps(&s.slot)));
    }

    let mut bands = SessionBands {
        mandatory: Vec::new(),
        unordered: Vec::new(),
        overflow: Vec::new(),
    };
    for entry in all {
        if entry.activity.is_mandatory() {
            bands.mandatory.push(entry);
        } else if entry.activity.is_overflow() {
            bands.overflow.push(entry);
        } else {
            bands.unordered.push(entry);
        }
    }
    Ok(bands)
}

/// Builds an activity's raw session list, before conflict filtering.
fn raw_sessions(activity: &Activity, block: &Block) -> Result<Vec<Session>, BlockplanError> {
    match &activity.criteria {
        EnrollmentCriteria::SelectTwoPeers { .. } => {
            // One session per group per frequency instance; only that
            // group's students are eligible.
            let slots = activity.frequency.instances(block.start, block.end);
            Ok(block
                .house
                .groups
                .iter()
                .flat_map(|group| {
                    slots
                        .iter()
                        .map(|slot| Session::new(*slot, group.students.clone()))
                })
                .collect())
        }
        EnrollmentCriteria::SelectMaxStudents { .. }
        | EnrollmentCriteria::SelectAllStudents { .. } => {
            let students = block.house.students();
            Ok(activity
                .frequency
                .instances(block.start, block.end)
                .into_iter()
                .map(|slot| Session::new(slot, students.clone()))
                .collect())
        }
        EnrollmentCriteria::OverflowFrom { master } => {
            let master_activity =
                block
                    .activity(master)
                    .ok_or_else(|| BlockplanError::UnknownMaster {
                        overflow: activity.name.clone(),
                        master: master.clone(),
                    })?;
            if master_activity.is_overflow() {
                return Err(BlockplanError::ChainedOverflow {
                    overflow: activity.name.clone(),
                    master: master.clone(),
                });
            }
            if master_activity.frequency != activity.frequency {
                return Err(BlockplanError::FrequencyMismatch {
                    overflow: activity.name.clone(),
                    master: master.clone(),
                });
            }
            // Same time grid, same eligible students as the master.
            raw_sessions(master_activity, block)
        }
    }
}
