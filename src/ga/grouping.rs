//! Genetic search over house groupings.
//!
//! Individuals are [`House`]s: one group per mentor, every student in
//! exactly one group. Crossover keeps a random selection of mentor slots
//! from the first parent, takes the remaining slots from the second parent
//! purged of duplicates, and deals the stranded students back evenly.

use rand::Rng;
use rand::seq::index::sample;
use std::collections::HashSet;

use super::types::{GaProblem, Individual};
use crate::balance::{distribute_into, rebalance};
use crate::fitness::GroupingScore;
use crate::grouping::{heuristic_grouping, random_grouping};
use crate::models::{Group, House, Student};
use crate::random::uniform_inclusive;

/// A house partition with its cached fitness.
#[derive(Debug, Clone)]
pub struct GroupingIndividual {
    /// The candidate partition.
    pub house: House,
    fitness: f64,
}

impl Individual for GroupingIndividual {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// GA problem over house partitions.
pub struct GroupingProblem {
    mentors: Vec<String>,
    students: Vec<Student>,
}

impl GroupingProblem {
    /// Creates the problem.
    pub fn new(mentors: Vec<String>, students: Vec<Student>) -> Self {
        Self { mentors, students }
    }

    /// One-directional merge of two parent partitions.
    fn merge<R: Rng>(&self, mum: &House, dad: &House, rng: &mut R) -> House {
        let slots = mum.groups.len();
        if slots == 0 {
            return mum.clone();
        }

        let keep = uniform_inclusive(rng, 1, slots);
        let mum_slots: HashSet<usize> = sample(rng, slots, keep).into_iter().collect();
        let mum_students: HashSet<&Student> = mum_slots
            .iter()
            .flat_map(|&i| mum.groups[i].students.iter())
            .collect();

        // Remaining slots come from dad, minus students mum already claimed.
        let dad_slots: Vec<usize> = (0..slots).filter(|i| !mum_slots.contains(i)).collect();
        let mut dad_lists: Vec<Vec<Student>> = dad_slots
            .iter()
            .map(|&i| {
                dad.groups[i]
                    .students
                    .iter()
                    .filter(|s| !mum_students.contains(s))
                    .cloned()
                    .collect()
            })
            .collect();

        let placed: HashSet<&Student> = mum_students
            .iter()
            .copied()
            .chain(dad_lists.iter().flatten())
            .collect();
        let strays: Vec<Student> = self
            .students
            .iter()
            .filter(|s| !placed.contains(s))
            .cloned()
            .collect();
        drop(placed);

        distribute_into(strays, &mut dad_lists);
        rebalance(&mut dad_lists);

        let mut dad_lists = dad_lists.into_iter();
        House::new(
            (0..slots)
                .map(|i| {
                    if mum_slots.contains(&i) {
                        mum.groups[i].clone()
                    } else {
                        Group::new(
                            dad.groups[i].mentor.clone(),
                            dad_lists.next().expect("one list per dad slot"),
                        )
                    }
                })
                .collect(),
        )
    }
}

impl GaProblem for GroupingProblem {
    type Individual = GroupingIndividual;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> GroupingIndividual {
        GroupingIndividual {
            house: random_grouping(&self.mentors, &self.students, rng),
            fitness: 0.0,
        }
    }

    fn initial_individual<R: Rng>(&self, index: usize, rng: &mut R) -> GroupingIndividual {
        if index == 0 {
            // Seed the search with the sort-based heuristic.
            GroupingIndividual {
                house: heuristic_grouping(&self.mentors, &self.students),
                fitness: 0.0,
            }
        } else {
            self.create_individual(rng)
        }
    }

    fn evaluate(&self, individual: &GroupingIndividual) -> f64 {
        GroupingScore::of_house(&individual.house).overall()
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &GroupingIndividual,
        parent2: &GroupingIndividual,
        rng: &mut R,
    ) -> (GroupingIndividual, GroupingIndividual) {
        (
            GroupingIndividual {
                house: self.merge(&parent1.house, &parent2.house, rng),
                fitness: 0.0,
            },
            GroupingIndividual {
                house: self.merge(&parent2.house, &parent1.house, rng),
                fitness: 0.0,
            },
        )
    }

    fn mutate<R: Rng>(&self, individual: &mut GroupingIndividual, rng: &mut R) {
        let groups = &mut individual.house.groups;
        let occupied: Vec<usize> = (0..groups.len())
            .filter(|&i| !groups[i].students.is_empty())
            .collect();
        if occupied.len() < 2 {
            return;
        }
        let first = occupied[rng.random_range(0..occupied.len())];
        let second = loop {
            let candidate = occupied[rng.random_range(0..occupied.len())];
            if candidate != first {
                break candidate;
            }
        };

        let i = rng.random_range(0..groups[first].students.len());
        let j = rng.random_range(0..groups[second].students.len());
        let swapped = groups[first].students[i].clone();
        groups[first].students[i] = groups[second].students[j].clone();
        groups[second].students[j] = swapped;
    }

    fn mutation_rate(&self) -> f64 {
        0.05
    }
}
