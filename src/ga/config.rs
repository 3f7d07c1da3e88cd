//! Genetic search configuration.

use crate::error::BlockplanError;

/// Parameters of the evolution loop.
///
/// # Builder Pattern
///
/// ```
/// use blockplan::ga::GaConfig;
///
/// let config = GaConfig::new(100, 200, 90.0)
///     .with_elite_ratio(0.1)
///     .with_seed(42);
/// assert_eq!(config.population_size, 100);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Maximum number of evolutions before returning the best seen.
    pub max_evolutions: usize,

    /// Fitness at which the search stops early, on the 0–100 scale.
    pub acceptable_score: f64,

    /// Fraction of the population preserved unchanged each generation.
    ///
    /// At least one individual always survives, so the best-so-far fitness
    /// is non-decreasing across generations.
    pub elite_ratio: f64,

    /// Whether to construct and cross individuals on rayon workers.
    pub parallel: bool,

    /// Master seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl GaConfig {
    /// Creates a configuration from the three required parameters.
    pub fn new(population_size: usize, max_evolutions: usize, acceptable_score: f64) -> Self {
        Self {
            population_size,
            max_evolutions,
            acceptable_score,
            elite_ratio: 0.1,
            parallel: true,
            seed: None,
        }
    }

    /// Sets the elite ratio, clamped to [0, 1].
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel construction and crossover.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the master seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of elites: `max(1, ceil(population · elite_ratio))`.
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elite_ratio).ceil() as usize).max(1)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`BlockplanError::InvalidConfig`] describing the first
    /// out-of-range parameter.
    pub fn validate(&self) -> Result<(), BlockplanError> {
        if self.population_size < 2 {
            return Err(BlockplanError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.max_evolutions == 0 {
            return Err(BlockplanError::InvalidConfig(
                "max_evolutions must be at least 1".into(),
            ));
        }
        if self.elite_count() >= self.population_size {
            return Err(BlockplanError::InvalidConfig(
                "elite_ratio too high: elites fill the entire population".into(),
            ));
        }
        Ok(())
    }
}
