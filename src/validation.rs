//! Input validation for block definitions.
//!
//! Checks structural integrity of a block before scheduling. Detects:
//! - Duplicate activity names (names are the activity identity)
//! - Overflow activities with a missing, mismatched, or chained master
//! - Students appearing in more than one group
//! - Empty houses and degenerate criteria parameters
//!
//! All problems are reported at once so a bad configuration can be fixed
//! in one pass. The session generator independently hard-fails on the
//! overflow frequency mismatch, which is fatal even without a pre-flight
//! check.

use std::collections::HashSet;

use crate::models::{Block, EnrollmentCriteria};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two activities share a name.
    DuplicateActivity,
    /// An overflow activity references a master that is not in the block.
    UnknownMaster,
    /// An overflow activity's frequency differs from its master's.
    FrequencyMismatch,
    /// An overflow activity's master is itself an overflow activity.
    ChainedOverflow,
    /// A student appears in more than one group.
    DuplicateStudent,
    /// The house has no students.
    EmptyHouse,
    /// A criteria parameter is degenerate (zero cap, zero role count).
    InvalidCriteria,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a block definition.
///
/// Checks:
/// 1. No duplicate activity names
/// 2. Every overflow master exists, is not itself overflow, and shares the
///    overflow activity's frequency
/// 3. The house is non-empty and no student appears in two groups
/// 4. Caps and per-block role counts are non-zero
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_block(block: &Block) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for activity in &block.activities {
        if !names.insert(activity.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateActivity,
                format!("Duplicate activity name: {}", activity.name),
            ));
        }
    }

    for activity in &block.activities {
        match &activity.criteria {
            EnrollmentCriteria::OverflowFrom { master } => match block.activity(master) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownMaster,
                    format!(
                        "Overflow activity '{}' references unknown master '{}'",
                        activity.name, master
                    ),
                )),
                Some(master_activity) if master_activity.is_overflow() => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::ChainedOverflow,
                        format!(
                            "Overflow activity '{}' is chained onto overflow activity '{}'",
                            activity.name, master
                        ),
                    ));
                }
                Some(master_activity) if master_activity.frequency != activity.frequency => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::FrequencyMismatch,
                        format!(
                            "Overflow activity '{}' does not share the frequency of master '{}'",
                            activity.name, master
                        ),
                    ));
                }
                Some(_) => {}
            },
            EnrollmentCriteria::SelectTwoPeers { times_per_block } if *times_per_block == 0 => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCriteria,
                    format!("Activity '{}' requires zero peer rounds", activity.name),
                ));
            }
            EnrollmentCriteria::SelectMaxStudents { cap, .. } if *cap == 0 => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCriteria,
                    format!("Activity '{}' has a zero student cap", activity.name),
                ));
            }
            _ => {}
        }
    }

    if block.house.student_count() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyHouse,
            format!("Block '{}' has no students", block.name),
        ));
    }

    let mut seen = HashSet::new();
    for group in &block.house.groups {
        for student in &group.students {
            if !seen.insert(student) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateStudent,
                    format!("Student '{}' appears in more than one group", student.full_name()),
                ));
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Activity, EnrollmentCriteria, Frequency, Gender, Group, House, HouseRule, Priority,
        Student, TimeSlot,
    };
    use chrono::{NaiveDate, NaiveTime};

    fn slot() -> TimeSlot {
        TimeSlot::new(
            NaiveDate::from_ymd_opt(2015, 10, 27).unwrap(),
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        )
    }

    fn house() -> House {
        House::new(vec![Group::new(
            "m1",
            vec![Student::new("Ada", "Lovelace", Gender::Female, 22, "Medicine")],
        )])
    }

    fn block_with(activities: Vec<Activity>) -> Block {
        Block::new(
            "clinical-year",
            "block-1",
            NaiveDate::from_ymd_opt(2015, 9, 29).unwrap(),
            NaiveDate::from_ymd_opt(2015, 12, 1).unwrap(),
            house(),
            activities,
        )
    }

    fn capped(name: &str) -> Activity {
        Activity::new(
            name,
            Frequency::Once(slot()),
            Priority::Neutral,
            EnrollmentCriteria::SelectMaxStudents {
                cap: 4,
                rule: HouseRule::AttendOnceThisYear,
            },
        )
    }

    fn overflow(name: &str, master: &str, frequency: Frequency) -> Activity {
        Activity::new(
            name,
            frequency,
            Priority::Lowest,
            EnrollmentCriteria::OverflowFrom {
                master: master.into(),
            },
        )
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_block() {
        let block = block_with(vec![
            capped("rounds"),
            overflow("self-study", "rounds", Frequency::Once(slot())),
        ]);
        assert!(validate_block(&block).is_ok());
    }

    #[test]
    fn test_duplicate_activity_name() {
        let block = block_with(vec![capped("rounds"), capped("rounds")]);
        assert!(kinds(validate_block(&block)).contains(&ValidationErrorKind::DuplicateActivity));
    }

    #[test]
    fn test_unknown_master() {
        let block = block_with(vec![overflow("self-study", "missing", Frequency::Once(slot()))]);
        assert!(kinds(validate_block(&block)).contains(&ValidationErrorKind::UnknownMaster));
    }

    #[test]
    fn test_frequency_mismatch() {
        let weekly = Frequency::Weekly(vec![(
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        )]);
        let block = block_with(vec![capped("rounds"), overflow("self-study", "rounds", weekly)]);
        assert!(kinds(validate_block(&block)).contains(&ValidationErrorKind::FrequencyMismatch));
    }

    #[test]
    fn test_chained_overflow() {
        let block = block_with(vec![
            capped("rounds"),
            overflow("quiet-room", "rounds", Frequency::Once(slot())),
            overflow("library", "quiet-room", Frequency::Once(slot())),
        ]);
        assert!(kinds(validate_block(&block)).contains(&ValidationErrorKind::ChainedOverflow));
    }

    #[test]
    fn test_duplicate_student_across_groups() {
        let ada = Student::new("Ada", "Lovelace", Gender::Female, 22, "Medicine");
        let mut block = block_with(vec![capped("rounds")]);
        block.house = House::new(vec![
            Group::new("m1", vec![ada.clone()]),
            Group::new("m2", vec![ada]),
        ]);
        assert!(kinds(validate_block(&block)).contains(&ValidationErrorKind::DuplicateStudent));
    }

    #[test]
    fn test_empty_house() {
        let mut block = block_with(vec![capped("rounds")]);
        block.house = House::new(vec![]);
        assert!(kinds(validate_block(&block)).contains(&ValidationErrorKind::EmptyHouse));
    }

    #[test]
    fn test_degenerate_criteria() {
        let zero_cap = Activity::new(
            "clinic",
            Frequency::Once(slot()),
            Priority::Neutral,
            EnrollmentCriteria::SelectMaxStudents {
                cap: 0,
                rule: HouseRule::AttendOnceThisYear,
            },
        );
        let zero_rounds = Activity::new(
            "peer-exam",
            Frequency::Once(slot()),
            Priority::Neutral,
            EnrollmentCriteria::SelectTwoPeers { times_per_block: 0 },
        );
        let found = kinds(validate_block(&block_with(vec![zero_cap, zero_rounds])));
        assert_eq!(
            found.iter().filter(|k| **k == ValidationErrorKind::InvalidCriteria).count(),
            2
        );
    }
}
