//! Genetic block scheduling and mentor-group formation.
//!
//! Solves two planning problems for cohort-based programs with the same
//! core engine — a fitness-driven genetic search over structured candidate
//! solutions, paired with constructive algorithms that build valid
//! candidates from scratch or repair partial ones:
//!
//! 1. **Block scheduling**: assign students to activity sessions while
//!    honoring enrollment criteria, per-block attendance obligations, and
//!    time conflicts.
//! 2. **Group formation**: partition a student population into mentor-led
//!    groups maximizing demographic diversity.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Student`, `House`, `Activity`,
//!   `Session`, `Block`, `BlockSchedule`, `AttendanceRecord`
//! - **`validation`**: Input integrity checks over a block definition
//! - **`scheduler`**: Session generation and constructive enrollment
//! - **`fitness`**: Grouping and schedule scoring (0–100, mean − stddev)
//! - **`grouping`**: Heuristic and random group formation
//! - **`ga`**: The genetic framework and its two problem instantiations
//! - **`random`** / **`stats`** / **`balance`**: leaf utilities
//!
//! # Example
//!
//! ```no_run
//! use blockplan::ga::{self, GaConfig};
//! use blockplan::scheduler::{EnrollStrategy, create_schedule};
//! use blockplan::models::{AttendanceRecord, Block};
//! use blockplan::random::create_rng;
//!
//! # fn demo(block: Block) -> Result<(), blockplan::BlockplanError> {
//! let attendance = AttendanceRecord::new();
//!
//! // One constructive pass, no search:
//! let mut rng = create_rng(42);
//! let quick = create_schedule(&block, &attendance, EnrollStrategy::Random, &mut rng)?;
//!
//! // Or evolve toward high fitness:
//! let config = GaConfig::new(100, 200, 90.0).with_seed(42);
//! let best = ga::evolve_schedule(&config, &block, &attendance)?;
//! # Ok(())
//! # }
//! ```

pub mod balance;
mod error;
pub mod fitness;
pub mod ga;
pub mod grouping;
pub mod models;
pub mod random;
pub mod scheduler;
pub mod stats;
pub mod validation;

pub use error::BlockplanError;
