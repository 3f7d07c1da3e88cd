//! Constructive group formation.
//!
//! Two ways to deal a student population into one group per mentor: a
//! deterministic heuristic that sorts by demographics before round-robin
//! dealing (used to seed the genetic search), and a uniformly random
//! dealing (used for the rest of the initial population).

use rand::Rng;

use crate::balance::distribute_evenly;
use crate::models::{Group, House, Student};
use crate::random::shuffled;

/// Sort-based heuristic: order students by (gender, age, major), then deal
/// round-robin so consecutive similar students land in different groups.
pub fn heuristic_grouping(mentors: &[String], students: &[Student]) -> House {
    let mut sorted = students.to_vec();
    sorted.sort_by(|a, b| {
        a.gender
            .cmp(&b.gender)
            .then_with(|| a.age.cmp(&b.age))
            .then_with(|| a.major.cmp(&b.major))
    });
    deal(mentors, sorted)
}

/// Uniformly random dealing.
pub fn random_grouping<R: Rng>(mentors: &[String], students: &[Student], rng: &mut R) -> House {
    deal(mentors, shuffled(rng, students))
}

fn deal(mentors: &[String], students: Vec<Student>) -> House {
    let bins = distribute_evenly(students, mentors.len());
    House::new(
        mentors
            .iter()
            .zip(bins)
            .map(|(mentor, students)| Group::new(mentor.clone(), students))
            .collect(),
    )
}
