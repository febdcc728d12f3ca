//! Expected-vs-actual evaluation for the two assertion directives.
//!
//! The checks are pure: the executor fetches counts and property
//! readings from the backend and hands them over here.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AssertionError {
    #[error("Count mismatch for {selector:?}: expected {expected}, actual {actual}")]
    CountMismatch {
        selector: String,
        expected: usize,
        actual: usize,
    },

    #[error("Property mismatch for {selector:?}: {}", format_diffs(mismatches))]
    PropertyMismatch {
        selector: String,
        mismatches: Vec<PropertyDiff>,
    },
}

/// One diverging property reading.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDiff {
    pub property: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for PropertyDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expected {:?}, actual {:?}",
            self.property, self.expected, self.actual
        )
    }
}

fn format_diffs(mismatches: &[PropertyDiff]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A selector matching zero elements when a positive count is
/// expected reports the mismatch; it never silently passes.
pub fn check_count(selector: &str, expected: usize, actual: usize) -> Result<(), AssertionError> {
    if expected == actual {
        return Ok(());
    }
    Err(AssertionError::CountMismatch {
        selector: selector.to_string(),
        expected,
        actual,
    })
}

/// Compare every declared property reading; all diverging properties
/// are collected into a single report rather than stopping at the
/// first.
pub fn check_properties(
    selector: &str,
    readings: &[(String, String, String)], // (property, expected, actual)
) -> Result<(), AssertionError> {
    let mismatches: Vec<PropertyDiff> = readings
        .iter()
        .filter(|(_, expected, actual)| expected != actual)
        .map(|(property, expected, actual)| PropertyDiff {
            property: property.clone(),
            expected: expected.clone(),
            actual: actual.clone(),
        })
        .collect();

    if mismatches.is_empty() {
        return Ok(());
    }
    Err(AssertionError::PropertyMismatch {
        selector: selector.to_string(),
        mismatches,
    })
}
