//! Input validation for line balancing problems.
//!
//! Checks structural integrity of a problem before any solution is
//! generated. Detects:
//! - Duplicate task IDs and dangling precedence references
//! - Circular precedence dependencies (DAG validation)
//! - Non-positive takt or processing times
//! - Negative objective weights
//!
//! Two findings are reported but not fatal: a task longer than takt time
//! (every construction attempt will stall) and an all-zero weight vector
//! (the weighted score falls back to 0).
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::HashSet;

use crate::models::{PrecedenceEdge, ProblemConfig, Task};
use crate::precedence;

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
    /// Two tasks share the same ID.
    DuplicateId,
    /// A precedence edge references a task that doesn't exist.
    InvalidPredecessor,
    /// A precedence edge from a task to itself.
    SelfPrecedence,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// Takt time is zero or negative.
    InvalidTaktTime,
    /// A task has zero or negative processing time.
    InvalidProcessingTime,
    /// A task alone exceeds takt time.
    TaskExceedsTakt,
    /// An objective weight is negative.
    NegativeWeight,
    /// All objective weights are zero.
    ZeroTotalWeight,
}

impl ValidationErrorKind {
    /// Whether this finding blocks solution generation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TaskExceedsTakt | Self::ZeroTotalWeight)
    }
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether this error blocks solution generation.
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

/// Validates a raw task list and precedence edge list.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. Both ends of every edge refer to a defined task
/// 3. No task precedes itself
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_definition(tasks: &[Task], edges: &[PrecedenceEdge]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    for edge in edges {
        for end in [&edge.predecessor, &edge.successor] {
            if !task_ids.contains(end.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!(
                        "Precedence {} -> {} references unknown task '{}'",
                        edge.predecessor, edge.successor, end
                    ),
                ));
            }
        }
        if edge.predecessor == edge.successor {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfPrecedence,
                format!("Task '{}' cannot precede itself", edge.predecessor),
            ));
        }
    }

    into_result(errors)
}

/// Validates a problem instance before solution generation.
///
/// Checks:
/// 1. Takt time is positive
/// 2. Every processing time is positive
/// 3. No task alone exceeds takt time (non-fatal)
/// 4. Weights are non-negative and not all zero (zero total is non-fatal)
/// 5. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
/// Use [`ValidationError::is_fatal`] to separate blocking errors from warnings.
pub fn validate_problem(config: &ProblemConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let takt = config.takt_time();

    if takt <= 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTaktTime,
            format!("Takt time must be positive, got {takt}"),
        ));
    }

    for task in config.tasks() {
        if task.processing_time <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidProcessingTime,
                format!(
                    "Task '{}' has non-positive processing time {}",
                    task.id, task.processing_time
                ),
            ));
        } else if takt > 0 && task.processing_time > takt {
            errors.push(ValidationError::new(
                ValidationErrorKind::TaskExceedsTakt,
                format!(
                    "Task '{}' needs {}s, more than takt time {}s",
                    task.id, task.processing_time, takt
                ),
            ));
        }
    }

    let w = config.weights();
    for (name, value) in [
        ("economic", w.economic),
        ("social", w.social),
        ("environmental", w.environmental),
    ] {
        if value < 0.0 || !value.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeWeight,
                format!("Weight '{name}' must be a non-negative number, got {value}"),
            ));
        }
    }
    if w.total() == 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroTotalWeight,
            "All objective weights are zero",
        ));
    }

    if let Some(root) = precedence::find_cycle_root(config) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("Circular dependency detected involving task '{root}'"),
        ));
    }

    into_result(errors)
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weights;

    fn sample_config() -> ProblemConfig {
        ProblemConfig::new(15)
            .with_task(Task::new("T1", 10).with_tool("M1"))
            .with_task(Task::new("T2", 10).with_tool("M1"))
            .with_task(Task::new("T3", 10).with_tool("M2"))
            .with_precedence("T1", "T2")
            .unwrap()
    }

    #[test]
    fn test_valid_problem() {
        assert!(validate_problem(&sample_config()).is_ok());
    }

    #[test]
    fn test_cyclic_dependency() {
        // T1 → T2 → T3 → T1
        let config = sample_config()
            .with_precedence("T2", "T3")
            .unwrap()
            .with_precedence("T3", "T1")
            .unwrap();

        let errors = validate_problem(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicDependency && e.is_fatal()));
    }

    #[test]
    fn test_invalid_takt_time() {
        let mut config = sample_config();
        config.set_takt_time(0);

        let errors = validate_problem(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidTaktTime));
    }

    #[test]
    fn test_invalid_processing_time() {
        let config = sample_config().with_task(Task::new("T4", 0));

        let errors = validate_problem(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidProcessingTime));
    }

    #[test]
    fn test_task_exceeds_takt_is_warning() {
        let config = sample_config().with_task(Task::new("T4", 20));

        let errors = validate_problem(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::TaskExceedsTakt);
        assert!(!errors[0].is_fatal());
    }

    #[test]
    fn test_weights() {
        let config = sample_config().with_weights(Weights::new(-1.0, 1.0, 1.0));
        let errors = validate_problem(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::NegativeWeight && e.is_fatal()));

        let config = sample_config().with_weights(Weights::new(0.0, 0.0, 0.0));
        let errors = validate_problem(&config).unwrap_err();
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::ZeroTotalWeight && !e.is_fatal()));
    }

    #[test]
    fn test_definition_duplicate_id() {
        let tasks = vec![Task::new("T1", 5), Task::new("T1", 6)];
        let errors = validate_definition(&tasks, &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_definition_dangling_edge() {
        let tasks = vec![Task::new("T1", 5)];
        let edges = vec![PrecedenceEdge::new("T1", "NONEXISTENT")];
        let errors = validate_definition(&tasks, &edges).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidPredecessor
                && e.message.contains("NONEXISTENT")));
    }

    #[test]
    fn test_definition_multiple_errors() {
        let tasks = vec![Task::new("T1", 5), Task::new("T1", 5)];
        let edges = vec![
            PrecedenceEdge::new("T1", "T1"),
            PrecedenceEdge::new("UNKNOWN", "T1"),
        ];
        let errors = validate_definition(&tasks, &edges).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_definition_valid() {
        let tasks = vec![Task::new("T1", 5), Task::new("T2", 5)];
        let edges = vec![PrecedenceEdge::new("T1", "T2")];
        assert!(validate_definition(&tasks, &edges).is_ok());
    }
}
