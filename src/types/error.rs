use thiserror::Error;

/// Raised by a rule predicate when it cannot reach a decision.
///
/// This is distinct from a rule returning `false`: a `RuleError` means the
/// rule itself is misconfigured or its backing check broke.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid argument for rule '{rule}': {reason}")]
    InvalidArgument { rule: String, reason: String },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0}")]
    Failed(String),
}

impl RuleError {
    pub fn invalid_argument(rule: &str, reason: impl Into<String>) -> Self {
        RuleError::InvalidArgument {
            rule: rule.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Errors that abort an evaluation.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },

    #[error("rule '{rule}' failed to execute: {source}")]
    RuleExecution {
        rule: String,
        #[source]
        source: RuleError,
    },
}
