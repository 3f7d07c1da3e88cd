//! Genetic search.
//!
//! A fitness-driven evolutionary loop instantiated twice: once over block
//! schedules, once over house groupings. The framework is generic
//! ([`GaProblem`] + [`GaRunner`]); the two problem modules plug the
//! domain's constructive algorithms and fitness functions into it.
//!
//! # Quick Start
//!
//! ```no_run
//! use blockplan::ga::{self, GaConfig};
//! use blockplan::models::{AttendanceRecord, Block};
//!
//! # fn demo(block: Block) -> Result<(), blockplan::BlockplanError> {
//! let attendance = AttendanceRecord::new();
//! let config = GaConfig::new(100, 200, 90.0).with_seed(42);
//! let schedule = ga::evolve_schedule(&config, &block, &attendance)?;
//! println!("{} sessions scheduled", schedule.session_count());
//! # Ok(())
//! # }
//! ```
//!
//! # Evolution step
//!
//! 1. Stop when the generation budget is spent or the best individual
//!    reaches the acceptable score.
//! 2. Elites (top `max(1, ceil(P·elite_ratio))`) pass through unchanged.
//! 3. The remaining slots are filled by parallel crossovers; parents are
//!    drawn uniformly from the top half.
//! 4. Children mutate at the problem's rate (1% schedules, 5% groupings).
//! 5. Rank by fitness descending.

mod config;
mod grouping;
mod runner;
mod schedule;
mod types;

pub use config::GaConfig;
pub use grouping::{GroupingIndividual, GroupingProblem};
pub use runner::{GaResult, GaRunner};
pub use schedule::{ScheduleIndividual, ScheduleProblem};
pub use types::{GaProblem, Individual};

use tracing::info;

use crate::error::BlockplanError;
use crate::models::{AttendanceRecord, Block, BlockSchedule, House, Student};

/// Evolves a block schedule and returns the best found.
///
/// # Errors
/// Fails on invalid configuration or on the configuration faults detected
/// by session generation.
pub fn evolve_schedule(
    config: &GaConfig,
    block: &Block,
    attendance: &AttendanceRecord,
) -> Result<BlockSchedule, BlockplanError> {
    let problem = ScheduleProblem::new(block, attendance)?;
    let result = GaRunner::run(&problem, config)?;
    info!(
        block = %block.name,
        evolutions = result.evolutions,
        fitness = result.best_fitness,
        reached_target = result.reached_target,
        "schedule evolution finished"
    );
    Ok(result.best.schedule)
}

/// Evolves a partition of `students` into one group per mentor and returns
/// the best found.
///
/// # Errors
/// Fails on invalid configuration or when `mentors` is empty.
pub fn evolve_grouping(
    config: &GaConfig,
    mentors: &[String],
    students: &[Student],
) -> Result<House, BlockplanError> {
    if mentors.is_empty() {
        return Err(BlockplanError::InvalidConfig(
            "at least one mentor is required".into(),
        ));
    }
    let problem = GroupingProblem::new(mentors.to_vec(), students.to_vec());
    let result = GaRunner::run(&problem, config)?;
    info!(
        mentors = mentors.len(),
        students = students.len(),
        evolutions = result.evolutions,
        fitness = result.best_fitness,
        "grouping evolution finished"
    );
    Ok(result.best.house)
}
