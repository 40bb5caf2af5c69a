use std::fmt;

use super::arg::Arg;

/// The result of running one rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct RuleOutcome {
    rule_name: String,
    args: Vec<Arg>,
    passed: bool,
}

impl RuleOutcome {
    pub fn new(rule_name: impl Into<String>, args: Vec<Arg>, passed: bool) -> Self {
        Self {
            rule_name: rule_name.into(),
            args,
            passed,
        }
    }

    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Effective arguments the rule ran with, registry defaults included.
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "passed" } else { "failed" };
        if self.args.is_empty() {
            write!(f, "{} {verdict}", self.rule_name)
        } else {
            let args: Vec<String> = self.args.iter().map(Arg::as_text).collect();
            write!(f, "{}:{} {verdict}", self.rule_name, args.join(","))
        }
    }
}

/// Outcome of validating one value against a [`RuleSpec`](super::RuleSpec).
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ValidationResult {
    /// Every rule passed, or none needed to run.
    Passed,
    /// The first rule that returned `false`, in evaluation order.
    Failed(RuleOutcome),
}

impl ValidationResult {
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, ValidationResult::Passed)
    }

    #[must_use]
    pub fn failure(&self) -> Option<&RuleOutcome> {
        match self {
            ValidationResult::Passed => None,
            ValidationResult::Failed(outcome) => Some(outcome),
        }
    }

    /// Name of the failing rule, if any.
    #[must_use]
    pub fn failed_rule(&self) -> Option<&str> {
        self.failure().map(RuleOutcome::rule_name)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationResult::Passed => write!(f, "passed"),
            ValidationResult::Failed(outcome) => write!(f, "{outcome}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_accessors() {
        let outcome = RuleOutcome::new("max", vec![Arg::from("5")], false);
        assert_eq!(outcome.rule_name(), "max");
        assert_eq!(outcome.args(), &[Arg::from("5")]);
        assert!(!outcome.passed());
    }

    #[test]
    fn result_accessors() {
        let failed = ValidationResult::Failed(RuleOutcome::new("email", vec![], false));
        assert!(!failed.is_passed());
        assert_eq!(failed.failed_rule(), Some("email"));
        assert!(ValidationResult::Passed.is_passed());
        assert_eq!(ValidationResult::Passed.failure(), None);
    }

    #[test]
    fn display() {
        let failed = ValidationResult::Failed(RuleOutcome::new(
            "between",
            vec![Arg::from("10"), Arg::from("18")],
            false,
        ));
        assert_eq!(failed.to_string(), "between:10,18 failed");
        assert_eq!(ValidationResult::Passed.to_string(), "passed");
    }
}
