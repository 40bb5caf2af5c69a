//! `between`, `max` and `min`.
//!
//! `max` and `min` are inclusive, `between` is exclusive at both ends.
//! Numeric values (numeric strings included) compare by value and other
//! strings by character count, unless a mode argument (`value` / `length`)
//! forces one or the other. Collections always compare by element count.

#![allow(clippy::cast_precision_loss)]

use super::{number_arg, text_arg};
use crate::registry::RuleResult;
use crate::{Arg, EvaluationContext, FieldValue, RuleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Auto,
    Value,
    Length,
}

fn mode(rule: &str, args: &[Arg], idx: usize) -> Result<Mode, RuleError> {
    match text_arg(args, idx).as_deref() {
        None => Ok(Mode::Auto),
        Some("value") => Ok(Mode::Value),
        Some("length") => Ok(Mode::Length),
        Some(other) => Err(RuleError::invalid_argument(
            rule,
            format!("unknown mode '{other}', expected 'value' or 'length'"),
        )),
    }
}

fn char_len(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::String(s) => Some(s.chars().count() as f64),
        FieldValue::Int(_) | FieldValue::Float(_) => {
            value.as_text().map(|s| s.chars().count() as f64)
        }
        _ => None,
    }
}

/// The quantity a size rule compares, or `None` if the value has none.
fn measure(value: &FieldValue, mode: Mode) -> Option<f64> {
    if let Some(len) = value.collection_len() {
        return Some(len as f64);
    }
    match mode {
        Mode::Value => value.as_number(),
        Mode::Length => char_len(value),
        Mode::Auto => value.as_number().or_else(|| value.as_str().and_then(|_| char_len(value))),
    }
}

pub(super) fn between(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let from = number_arg("between", args, 0)?;
    let to = number_arg("between", args, 1)?;
    let mode = mode("between", args, 2)?;
    Ok(measure(value, mode).is_some_and(|m| m > from && m < to))
}

pub(super) fn max(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let limit = number_arg("max", args, 0)?;
    let mode = mode("max", args, 1)?;
    Ok(measure(value, mode).is_some_and(|m| m <= limit))
}

pub(super) fn min(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let limit = number_arg("min", args, 0)?;
    let mode = mode("min", args, 1)?;
    Ok(measure(value, mode).is_some_and(|m| m >= limit))
}
