//! Fitness scoring.
//!
//! Both genetic searches maximize a scalar in [0, 100] derived from a
//! coverage mean minus a variance penalty: [`GroupingScore`] for house
//! partitions, [`ScheduleScore`] for block schedules. The breakdown
//! structs expose every dimension so callers can report *why* a candidate
//! scored the way it did, not just the scalar.

mod grouping;
mod schedule;

pub use grouping::GroupingScore;
pub use schedule::ScheduleScore;
