//! Crate error type.
//!
//! Errors here are configuration or contract faults detected before or
//! during a run. Domain-level shortfalls (a peer session that cannot be
//! filled, a search that never reaches the acceptable score) are ordinary
//! values, not errors.

use thiserror::Error;

/// Errors raised by session generation, enrollment, and the genetic drivers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockplanError {
    /// An overflow activity's frequency differs from its master's.
    #[error(
        "overflow activity '{overflow}' does not share the frequency of its master '{master}'"
    )]
    FrequencyMismatch {
        /// Name of the overflow activity.
        overflow: String,
        /// Name of the master activity.
        master: String,
    },

    /// An overflow activity references a master that is not in the block.
    #[error("overflow activity '{overflow}' references unknown master activity '{master}'")]
    UnknownMaster {
        /// Name of the overflow activity.
        overflow: String,
        /// Name of the missing master activity.
        master: String,
    },

    /// An overflow activity references another overflow activity as master.
    #[error("overflow activity '{overflow}' is chained onto overflow activity '{master}'")]
    ChainedOverflow {
        /// Name of the outer overflow activity.
        overflow: String,
        /// Name of the overflow master.
        master: String,
    },

    /// A constructive enroller was invoked on an activity it cannot schedule
    /// (mandatory and overflow activities have dedicated passes).
    #[error("activity '{0}' cannot be scheduled by the constructive enroller")]
    NotSchedulable(String),

    /// A genetic configuration parameter is out of range.
    #[error("invalid genetic configuration: {0}")]
    InvalidConfig(String),
}
