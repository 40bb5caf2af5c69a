//! Declarative field validation.
//!
//! A [`RuleSpec`] is an ordered list of named rules, written either as a
//! pipe-delimited string (`"required|between:10,18"`) or as a structured list.
//! Rule names resolve against a [`RuleRegistry`](registry::RuleRegistry);
//! the process-wide one comes preloaded with the built-in rules and accepts
//! custom synchronous and asynchronous rules at any time.
//!
//! Evaluation runs the rules in order, awaits each one and stops at the first
//! failure. Empty values skip every rule unless the spec contains `required`
//! or `accepted`.
//!
//! ```
//! use fieldcheck::{EvaluationContext, FieldValue, RuleSpec};
//!
//! let spec: RuleSpec = "required|between:10,18".parse().unwrap();
//! let ctx = EvaluationContext::standalone("age");
//!
//! let result = spec.evaluate_blocking(&FieldValue::from("15"), &ctx).unwrap();
//! assert!(result.is_passed());
//!
//! let result = spec.evaluate_blocking(&FieldValue::from("9"), &ctx).unwrap();
//! assert_eq!(result.failed_rule(), Some("between"));
//! ```

mod error;
mod evaluate;
pub mod message;
pub mod parse;
pub mod registry;
mod rules;
mod sequence;
mod types;

pub use error::Error;
pub use parse::{parse, parse_list, ParseError, RuleSource};
pub use registry::{AsyncRule, RuleEntry, RuleRegistry, RuleResult, SyncRule};
pub use sequence::{Sequencer, Ticket};
pub use types::{
    is_slash_literal, Arg, EvaluationContext, EvaluationError, EvaluationReport, FieldValue,
    FileInfo, FormValues, ParsedRule, RuleError, RuleOutcome, RuleSpec, RuleSpecBuilder,
    ValidationResult,
};

/// Parse `spec` and evaluate it against the process-wide registry.
///
/// # Errors
///
/// [`Error::Parse`] for malformed DSL, [`Error::Evaluation`] for unknown
/// rule names or rules that could not run.
pub async fn validate(
    spec: &str,
    value: &FieldValue,
    ctx: &EvaluationContext<'_>,
) -> Result<ValidationResult, Error> {
    let spec = parse(spec)?;
    Ok(spec.evaluate(value, ctx).await?)
}
