//! The evolution loop.
//!
//! One evolution: keep the elites, fill the remaining slots with children
//! from parallel crossovers of parents drawn from the top half, mutate
//! each child at the problem's rate, evaluate, and re-rank. The loop stops
//! when the generation budget is spent or the best individual reaches the
//! acceptable score.
//!
//! Elites pass through untouched, so the best-so-far fitness is
//! non-decreasing across generations.

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use super::config::GaConfig;
use super::types::{GaProblem, Individual};
use crate::error::BlockplanError;
use crate::random::{create_rng, derive_seeds};

/// Result of a genetic run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Number of evolutions executed.
    pub evolutions: usize,

    /// Whether the acceptable score was reached before the budget ran out.
    pub reached_target: bool,

    /// Best fitness after initialization and after each evolution.
    pub fitness_history: Vec<f64>,
}

/// Executes the evolution loop for a [`GaProblem`].
pub struct GaRunner;

impl GaRunner {
    /// Runs the genetic search.
    ///
    /// # Errors
    /// Fails when the configuration is invalid.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, BlockplanError> {
        config.validate()?;

        let mut rng = create_rng(config.seed.unwrap_or_else(rand::random));

        // Initial population: independent constructions, each worker on
        // its own derived seed.
        let seeds = derive_seeds(&mut rng, config.population_size);
        let mut population: Vec<P::Individual> = if config.parallel {
            seeds
                .par_iter()
                .enumerate()
                .map(|(index, &seed)| build_individual(problem, index, seed))
                .collect()
        } else {
            seeds
                .iter()
                .enumerate()
                .map(|(index, &seed)| build_individual(problem, index, seed))
                .collect()
        };
        sort_descending(&mut population);

        let mut fitness_history = Vec::with_capacity(config.max_evolutions + 1);
        fitness_history.push(population[0].fitness());

        let mut reached_target = false;
        let mut evolutions = 0;

        for generation in 0..config.max_evolutions {
            if population[0].fitness() >= config.acceptable_score {
                reached_target = true;
                break;
            }

            let elite_count = config.elite_count();
            let offspring_slots = config.population_size - elite_count;
            let pair_count = offspring_slots.div_ceil(2);

            // Parents come from the top half of the already-sorted
            // population; pairs and worker seeds are drawn sequentially so
            // the parallel section stays reproducible.
            let top = top_half(config.population_size);
            let tasks: Vec<(usize, usize, u64)> = (0..pair_count)
                .map(|_| {
                    let (mum, dad) = two_distinct(&mut rng, top);
                    (mum, dad, rng.random())
                })
                .collect();

            let offspring: Vec<(P::Individual, P::Individual)> = if config.parallel {
                tasks
                    .par_iter()
                    .map(|&(mum, dad, seed)| {
                        breed(problem, &population[mum], &population[dad], seed)
                    })
                    .collect()
            } else {
                tasks
                    .iter()
                    .map(|&(mum, dad, seed)| {
                        breed(problem, &population[mum], &population[dad], seed)
                    })
                    .collect()
            };

            let mut next: Vec<P::Individual> = population[..elite_count].to_vec();
            for (first, second) in offspring {
                next.push(first);
                next.push(second);
            }
            next.truncate(config.population_size);
            sort_descending(&mut next);
            population = next;

            evolutions = generation + 1;
            fitness_history.push(population[0].fitness());
            debug!(
                generation = evolutions,
                best = population[0].fitness(),
                "evolution complete"
            );
        }

        if !reached_target && population[0].fitness() >= config.acceptable_score {
            reached_target = true;
        }

        let best = population.into_iter().next().expect("population is non-empty");
        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            evolutions,
            reached_target,
            fitness_history,
        })
    }
}

/// Constructs and evaluates one initial individual on its own RNG.
fn build_individual<P: GaProblem>(problem: &P, index: usize, seed: u64) -> P::Individual {
    let mut rng = create_rng(seed);
    let mut individual = problem.initial_individual(index, &mut rng);
    let fitness = problem.evaluate(&individual);
    individual.set_fitness(fitness);
    individual
}

/// Crosses two parents and finishes both children: optional mutation,
/// then evaluation.
fn breed<P: GaProblem>(
    problem: &P,
    mum: &P::Individual,
    dad: &P::Individual,
    seed: u64,
) -> (P::Individual, P::Individual) {
    let mut rng = create_rng(seed);
    let (mut first, mut second) = problem.crossover(mum, dad, &mut rng);
    for child in [&mut first, &mut second] {
        if rng.random_bool(problem.mutation_rate()) {
            problem.mutate(child, &mut rng);
        }
        let fitness = problem.evaluate(child);
        child.set_fitness(fitness);
    }
    (first, second)
}

/// Size of the parent pool: the top half, but never fewer than two.
fn top_half(population_size: usize) -> usize {
    (population_size / 2).max(2).min(population_size)
}

/// Two distinct indices drawn uniformly from `0..bound`.
fn two_distinct<R: Rng>(rng: &mut R, bound: usize) -> (usize, usize) {
    let first = rng.random_range(0..bound);
    loop {
        let second = rng.random_range(0..bound);
        if second != first {
            return (first, second);
        }
    }
}

fn sort_descending<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        b.fitness()
            .partial_cmp(&a.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
