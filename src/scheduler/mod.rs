//! Constructive scheduling.
//!
//! Turns a block definition into an enrolled [`BlockSchedule`](crate::models::BlockSchedule)
//! without any search: materialize the session grid, fill the mandatory
//! band, fill the unordered band through a priority-driven
//! [`EnrollStrategy`], then derive the overflow band. The genetic layer
//! builds on these same passes for construction and repair.
//!
//! # Pipeline
//!
//! | Pass | Input | Output |
//! |------|-------|--------|
//! | `create_sessions` | block | three session bands |
//! | `enroll_mandatory` | mandatory band | whole-house enrollments |
//! | `EnrollStrategy::enroll` | unordered band | conflict-free enrollments |
//! | `enroll_overflow` | overflow band + the rest | complement enrollments |

mod enroll;
mod filler;
pub mod predicates;
mod sessions;

pub use enroll::{
    EnrollStrategy, create_schedule, enroll_mandatory, enroll_overflow, fill_schedule,
};
pub use sessions::{SessionBands, create_sessions};
