use std::fmt;
use std::time::Duration;

use super::outcome::{RuleOutcome, ValidationResult};

/// Detailed evaluation report returned by
/// [`RuleSpec::evaluate_detailed()`](super::RuleSpec::evaluate_detailed).
///
/// Contains the result, the outcome of every rule that actually ran (in
/// evaluation order), whether the empty-value short-circuit fired, and the
/// wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    result: ValidationResult,
    outcomes: Vec<RuleOutcome>,
    skipped_empty: bool,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        result: ValidationResult,
        outcomes: Vec<RuleOutcome>,
        skipped_empty: bool,
        duration: Duration,
    ) -> Self {
        Self {
            result,
            outcomes,
            skipped_empty,
            duration,
        }
    }

    /// The validation result, same as [`RuleSpec::evaluate()`](super::RuleSpec::evaluate).
    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    /// Outcomes of the rules that ran, in evaluation order.
    #[must_use]
    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    /// Names of the rules that ran, in evaluation order.
    #[must_use]
    pub fn evaluation_order(&self) -> Vec<&str> {
        self.outcomes.iter().map(RuleOutcome::rule_name).collect()
    }

    /// `true` when the value was empty and no rule needed to run.
    #[must_use]
    pub fn skipped_empty(&self) -> bool {
        self.skipped_empty
    }

    /// Wall-clock duration of the evaluation, awaited rules included.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn into_result(self) -> ValidationResult {
        self.result
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "result: {}", self.result)?;
        write!(f, ", ran: [{}]", self.evaluation_order().join(", "))?;
        if self.skipped_empty {
            write!(f, ", skipped (empty)")?;
        }
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
