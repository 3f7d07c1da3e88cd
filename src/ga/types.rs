//! Core trait definitions for the genetic framework.
//!
//! The two central traits — [`Individual`] and [`GaProblem`] — define the
//! contract between the generic evolution loop and the two domain
//! problems (block schedules and house groupings).
//!
//! Fitness is a scalar in [0, 100]; **higher is better**. Every score in
//! this crate is a coverage mean minus a variance penalty on that scale,
//! so the framework maximizes throughout.

use rand::Rng;

/// A candidate solution in the population.
///
/// Individuals carry their own fitness value. The framework calls
/// [`GaProblem::evaluate`] to compute fitness, then stores it via
/// [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    /// The current fitness of this individual (higher is better).
    fn fitness(&self) -> f64;

    /// Stores a freshly evaluated fitness.
    fn set_fitness(&mut self, fitness: f64);
}

/// Defines a genetic optimization problem.
///
/// Implementations provide construction, evaluation, crossover, and
/// mutation for one chromosome type. The runner may call `evaluate` and
/// `crossover` from rayon workers, hence the `Send + Sync` bound; each
/// worker passes its own RNG.
pub trait GaProblem: Send + Sync {
    /// The solution type for this problem.
    type Individual: Individual;

    /// Creates a random individual.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Creates the individual at `index` of the initial population.
    ///
    /// The default delegates to [`create_individual`](Self::create_individual);
    /// problems that seed specific slots with heuristics override this.
    fn initial_individual<R: Rng>(&self, _index: usize, rng: &mut R) -> Self::Individual {
        self.create_individual(rng)
    }

    /// Evaluates an individual, returning its fitness in [0, 100].
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    /// Produces two offspring by recombining two parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut R,
    ) -> (Self::Individual, Self::Individual);

    /// Mutates an individual in place.
    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rng: &mut R);

    /// Per-child probability of applying [`mutate`](Self::mutate) each
    /// generation.
    fn mutation_rate(&self) -> f64;
}
