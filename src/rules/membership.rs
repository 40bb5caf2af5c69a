use super::cached_regex;
use crate::registry::RuleResult;
use crate::{is_slash_literal, Arg, EvaluationContext, FieldValue, RuleError};

fn in_stack(value: &FieldValue, stack: &[Arg]) -> bool {
    stack.iter().any(|arg| arg.loosely_equals(value))
}

/// Membership. A list value passes when every element is in the set.
pub(super) fn in_set(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    Ok(match value {
        FieldValue::List(items) => items.iter().all(|item| in_stack(item, args)),
        other => in_stack(other, args),
    })
}

/// Non-membership. A list value passes when no element is in the set.
pub(super) fn not_in_set(
    value: &FieldValue,
    args: &[Arg],
    _: &EvaluationContext<'_>,
) -> RuleResult {
    Ok(match value {
        FieldValue::List(items) => !items.iter().any(|item| in_stack(item, args)),
        other => !in_stack(other, args),
    })
}

/// Passes if the value equals any literal argument or matches any pattern.
///
/// Patterns are either [`Arg::Pattern`] or `/.../` strings, compiled once
/// and cached.
pub(super) fn matches(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let Some(text) = value.as_text() else {
        return Ok(false);
    };

    for arg in args {
        let hit = match arg {
            Arg::Pattern(re) => re.is_match(&text),
            Arg::Str(s) if is_slash_literal(s) => {
                let source = &s[1..s.len() - 1];
                let re = cached_regex(source).map_err(|source_err| RuleError::InvalidPattern {
                    pattern: s.clone(),
                    source: source_err,
                })?;
                re.is_match(&text)
            }
            literal => literal.loosely_equals(value),
        };
        if hit {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    fn ctx() -> EvaluationContext<'static> {
        EvaluationContext::standalone("field")
    }

    fn args(list: &[&str]) -> Vec<Arg> {
        list.iter().map(|s| Arg::from(*s)).collect()
    }

    #[test]
    fn in_and_not() {
        let stack = args(&["a", "b"]);
        assert!(in_set(&FieldValue::from("a"), &stack, &ctx()).unwrap());
        assert!(!in_set(&FieldValue::from("c"), &stack, &ctx()).unwrap());
        assert!(!not_in_set(&FieldValue::from("a"), &stack, &ctx()).unwrap());
        assert!(not_in_set(&FieldValue::from("c"), &stack, &ctx()).unwrap());
    }

    #[test]
    fn in_with_numbers() {
        let stack = args(&["1", "2", "3"]);
        assert!(in_set(&FieldValue::Int(2), &stack, &ctx()).unwrap());
        assert!(!in_set(&FieldValue::Int(4), &stack, &ctx()).unwrap());
    }

    #[test]
    fn list_values() {
        let stack = args(&["red", "green", "blue"]);
        let picked = FieldValue::List(vec![FieldValue::from("red"), FieldValue::from("blue")]);
        let stray = FieldValue::List(vec![FieldValue::from("red"), FieldValue::from("pink")]);
        assert!(in_set(&picked, &stack, &ctx()).unwrap());
        assert!(!in_set(&stray, &stack, &ctx()).unwrap());
        assert!(!not_in_set(&stray, &stack, &ctx()).unwrap());
        let clean = FieldValue::List(vec![FieldValue::from("pink")]);
        assert!(not_in_set(&clean, &stack, &ctx()).unwrap());
    }

    #[test]
    fn matches_literals_and_patterns() {
        let stack = args(&["exact", r"/^\d{3}$/"]);
        assert!(matches(&FieldValue::from("exact"), &stack, &ctx()).unwrap());
        assert!(matches(&FieldValue::from("123"), &stack, &ctx()).unwrap());
        assert!(matches(&FieldValue::Int(456), &stack, &ctx()).unwrap());
        assert!(!matches(&FieldValue::from("1234"), &stack, &ctx()).unwrap());
    }

    #[test]
    fn matches_compiled_pattern() {
        let stack = vec![Arg::Pattern(Regex::new("^[a-z,]+$").unwrap())];
        assert!(matches(&FieldValue::from("a,b,c"), &stack, &ctx()).unwrap());
        assert!(!matches(&FieldValue::from("A"), &stack, &ctx()).unwrap());
    }

    #[test]
    fn matches_invalid_pattern_is_error() {
        let result = matches(&FieldValue::from("x"), &args(&["/(/"]), &ctx());
        assert!(matches!(result, Err(RuleError::InvalidPattern { .. })));
    }

    #[test]
    fn matches_stops_at_first_hit() {
        // The malformed pattern after the hit is never compiled.
        let stack = args(&["x", "/(/"]);
        assert!(matches(&FieldValue::from("x"), &stack, &ctx()).unwrap());
    }

    #[test]
    fn matches_collections_fail() {
        let list = FieldValue::List(vec![FieldValue::from("a")]);
        assert!(!matches(&list, &args(&["a"]), &ctx()).unwrap());
    }
}
