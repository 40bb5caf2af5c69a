use crate::registry::RuleResult;
use crate::{Arg, EvaluationContext, FieldValue};

/// `false` for `required:false` and `required:no`.
pub(super) fn required_enabled(args: &[Arg]) -> bool {
    match args.first() {
        Some(Arg::Str(s)) if s == "no" => false,
        Some(arg) => arg.as_bool().unwrap_or(true),
        None => true,
    }
}

/// Fails only on empty values. `required:false` (or `no`) turns it off.
pub(super) fn required(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    Ok(!required_enabled(args) || !value.is_empty())
}

/// Passes for the usual "checkbox ticked" values.
pub(super) fn accepted(value: &FieldValue, _: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    Ok(match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Int(n) => *n == 1,
        FieldValue::String(s) => matches!(s.as_str(), "yes" | "on" | "1" | "true"),
        _ => false,
    })
}
