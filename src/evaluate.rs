use std::sync::Arc;
use std::time::Instant;

use crate::registry::RuleEntry;
use crate::{
    EvaluationContext, EvaluationError, EvaluationReport, FieldValue, ParsedRule, RuleOutcome,
    ValidationResult,
};

/// Run the pipeline. `entries[i]` is the resolved registry entry for `rules[i]`.
pub(crate) async fn evaluate(
    rules: &[ParsedRule],
    entries: &[Arc<RuleEntry>],
    value: &FieldValue,
    ctx: &EvaluationContext<'_>,
) -> Result<ValidationResult, EvaluationError> {
    run(rules, entries, value, ctx, None)
        .await
        .map(|(result, _)| result)
}

pub(crate) async fn evaluate_detailed(
    rules: &[ParsedRule],
    entries: &[Arc<RuleEntry>],
    value: &FieldValue,
    ctx: &EvaluationContext<'_>,
) -> Result<EvaluationReport, EvaluationError> {
    let start = Instant::now();
    let mut outcomes = Vec::with_capacity(rules.len());
    let (result, skipped_empty) = run(rules, entries, value, ctx, Some(&mut outcomes)).await?;
    Ok(EvaluationReport::new(
        result,
        outcomes,
        skipped_empty,
        start.elapsed(),
    ))
}

/// Returns the result and whether the empty-value short-circuit fired.
async fn run(
    rules: &[ParsedRule],
    entries: &[Arc<RuleEntry>],
    value: &FieldValue,
    ctx: &EvaluationContext<'_>,
    mut trace: Option<&mut Vec<RuleOutcome>>,
) -> Result<(ValidationResult, bool), EvaluationError> {
    debug_assert_eq!(rules.len(), entries.len());

    if rules.is_empty() {
        return Ok((ValidationResult::Passed, false));
    }

    if value.is_empty()
        && !rules
            .iter()
            .zip(entries)
            .any(|(rule, entry)| entry.requires_value(&entry.effective_args(&rule.args)))
    {
        tracing::trace!(field = ctx.field(), "empty optional value, skipping rules");
        return Ok((ValidationResult::Passed, true));
    }

    for (rule, entry) in rules.iter().zip(entries) {
        let args = entry.effective_args(&rule.args);
        let passed = entry
            .predicate()
            .invoke(value, &args, ctx)
            .await
            .map_err(|source| {
                tracing::debug!(
                    field = ctx.field(),
                    rule = %rule.name,
                    error = %source,
                    "rule errored"
                );
                EvaluationError::RuleExecution {
                    rule: rule.name.clone(),
                    source,
                }
            })?;
        tracing::trace!(field = ctx.field(), rule = %rule.name, passed, "rule evaluated");

        let outcome = RuleOutcome::new(rule.name.clone(), args, passed);
        if let Some(trace) = trace.as_deref_mut() {
            trace.push(outcome.clone());
        }
        if !passed {
            tracing::debug!(field = ctx.field(), rule = %rule.name, "validation failed");
            return Ok((ValidationResult::Failed(outcome), false));
        }
    }

    Ok((ValidationResult::Passed, false))
}
