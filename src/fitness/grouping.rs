//! Grouping fitness: demographic diversity of mentor groups.
//!
//! Scores a partition of students on three dimensions, each 0–100:
//!
//! - **Gender**: how close the group is to an even male/female split.
//! - **Age**: how spread the ages are (all distinct = 100).
//! - **Major**: same formula as age, over the major attribute.
//!
//! A group containing two students with the same last name scores zero on
//! all three dimensions.

use std::collections::HashMap;

use crate::models::{Gender, Group, House};
use crate::stats::mean;

/// Per-dimension diversity scores, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingScore {
    /// Gender balance.
    pub gender: f64,
    /// Age diversity.
    pub age: f64,
    /// Major diversity.
    pub major: f64,
}

impl GroupingScore {
    /// Scores a single group.
    pub fn of_group(group: &Group) -> Self {
        let n = group.students.len();
        if n == 0 || group.has_duplicate_last_name() {
            return Self {
                gender: 0.0,
                age: 0.0,
                major: 0.0,
            };
        }
        Self {
            gender: gender_balance(group),
            age: attribute_diversity(group, |s| s.age.to_string()),
            major: attribute_diversity(group, |s| s.major.clone()),
        }
    }

    /// Scores a house: the per-dimension mean across its groups.
    pub fn of_house(house: &House) -> Self {
        let scores: Vec<GroupingScore> = house.groups.iter().map(Self::of_group).collect();
        Self {
            gender: mean(&scores.iter().map(|s| s.gender).collect::<Vec<_>>()),
            age: mean(&scores.iter().map(|s| s.age).collect::<Vec<_>>()),
            major: mean(&scores.iter().map(|s| s.major).collect::<Vec<_>>()),
        }
    }

    /// The scalar fitness: mean of the three dimensions.
    pub fn overall(&self) -> f64 {
        (self.gender + self.age + self.major) / 3.0
    }
}

/// 100 when male and female counts cancel out, scaled down by imbalance.
fn gender_balance(group: &Group) -> f64 {
    let n = group.students.len() as f64;
    let sum: i64 = group
        .students
        .iter()
        .map(|s| match s.gender {
            Gender::Male => 1,
            Gender::Female => -1,
            Gender::NotSpecified => 0,
        })
        .sum();
    100.0 * (n - sum.abs() as f64) / n
}

/// 100 when all values are distinct; repeated values raise the collision
/// term `Σk² − n`, inverted against `n²`.
fn attribute_diversity(group: &Group, attribute: impl Fn(&crate::models::Student) -> String) -> f64 {
    let n = group.students.len() as f64;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for student in &group.students {
        *counts.entry(attribute(student)).or_insert(0) += 1;
    }
    let collisions: f64 = counts.values().map(|&k| (k * k) as f64).sum::<f64>() - n;
    100.0 * (n * n - collisions) / (n * n)
}
