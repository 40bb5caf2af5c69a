use std::sync::OnceLock;

use regex::Regex;

use super::text_arg;
use crate::registry::RuleResult;
use crate::{Arg, EvaluationContext, FieldValue, RuleError};

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHA_DEFAULT: OnceLock<Regex> = OnceLock::new();
static ALPHA_LATIN: OnceLock<Regex> = OnceLock::new();
static ALNUM_DEFAULT: OnceLock<Regex> = OnceLock::new();
static ALNUM_LATIN: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern compiles"))
}

fn email_regex() -> &'static Regex {
    // RFC 5322, simplified
    cached(
        &EMAIL_REGEX,
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
}

fn charset(
    rule: &str,
    args: &[Arg],
    default: &'static Regex,
    latin: &'static Regex,
) -> Result<&'static Regex, RuleError> {
    match text_arg(args, 0).as_deref() {
        None | Some("default") => Ok(default),
        Some("latin") => Ok(latin),
        Some(other) => Err(RuleError::invalid_argument(
            rule,
            format!("unknown character set '{other}', expected 'default' or 'latin'"),
        )),
    }
}

/// Letters only. The `default` set admits accented Latin-1 letters, `latin`
/// is ASCII only.
pub(super) fn alpha(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let re = charset(
        "alpha",
        args,
        cached(&ALPHA_DEFAULT, r"^[a-zA-ZÀ-ÖØ-öø-ÿ]+$"),
        cached(&ALPHA_LATIN, r"^[a-zA-Z]+$"),
    )?;
    Ok(value.as_text().is_some_and(|s| re.is_match(&s)))
}

pub(super) fn alphanumeric(
    value: &FieldValue,
    args: &[Arg],
    _: &EvaluationContext<'_>,
) -> RuleResult {
    let re = charset(
        "alphanumeric",
        args,
        cached(&ALNUM_DEFAULT, r"^[a-zA-Z0-9À-ÖØ-öø-ÿ]+$"),
        cached(&ALNUM_LATIN, r"^[a-zA-Z0-9]+$"),
    )?;
    Ok(value.as_text().is_some_and(|s| re.is_match(&s)))
}

pub(super) fn email(value: &FieldValue, _: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    Ok(value.as_str().is_some_and(|s| email_regex().is_match(s)))
}

/// A finite number, or a string that parses as one.
pub(super) fn number(value: &FieldValue, _: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    Ok(value.as_number().is_some_and(f64::is_finite))
}

/// An absolute URL with a host.
pub(super) fn url(value: &FieldValue, _: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    Ok(value
        .as_str()
        .and_then(|s| url::Url::parse(s.trim()).ok())
        .is_some_and(|u| u.has_host()))
}

fn affix_rule(value: &FieldValue, args: &[Arg], test: fn(&str, &str) -> bool) -> bool {
    let affixes: Vec<String> = args.iter().map(Arg::as_text).filter(|s| !s.is_empty()).collect();
    if affixes.is_empty() {
        return true;
    }
    let check = |s: &str| affixes.iter().any(|a| test(s, a));
    match value {
        FieldValue::String(s) => check(s),
        FieldValue::List(items) => items.iter().all(|item| item.as_str().is_some_and(|s| check(s))),
        _ => false,
    }
}

/// The value starts with one of the arguments. Lists need every item to.
pub(super) fn starts_with(
    value: &FieldValue,
    args: &[Arg],
    _: &EvaluationContext<'_>,
) -> RuleResult {
    Ok(affix_rule(value, args, |s, a| s.starts_with(a)))
}

/// The value ends with one of the arguments. Lists need every item to.
pub(super) fn ends_with(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    Ok(affix_rule(value, args, |s, a| s.ends_with(a)))
}
