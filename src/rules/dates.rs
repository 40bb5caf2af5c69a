use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use super::cached_regex;
use crate::registry::RuleResult;
use crate::{Arg, EvaluationContext, FieldValue, RuleError};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Best-effort parse of a date or date-time string.
///
/// RFC 3339 and RFC 2822 keep their offsets; everything else is read as UTC.
pub(crate) fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(ndt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

const FORMAT_TOKENS: &[(&str, &str)] = &[
    ("YYYY", r"\d{4}"),
    ("YY", r"\d{2}"),
    ("MM", "(0[1-9]|1[012])"),
    ("M", "([1-9]|1[012])"),
    ("DD", "(0[1-9]|[12][0-9]|3[01])"),
    ("D", "(0?[1-9]|[12][0-9]|3[01])"),
];

/// Translate a format such as `MM/DD/YYYY` into an anchored regex.
///
/// Only digit positions are checked; `02/31/2020` matches `MM/DD/YYYY`.
fn format_regex(format: &str) -> Result<Regex, RuleError> {
    let mut pattern = String::from("^");
    let mut rest = format;
    'scan: while let Some(c) = rest.chars().next() {
        for (token, re) in FORMAT_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                pattern.push_str(re);
                rest = tail;
                continue 'scan;
            }
        }
        let mut buf = [0_u8; 4];
        pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        rest = &rest[c.len_utf8()..];
    }
    pattern.push('$');
    cached_regex(&pattern).map_err(|source| RuleError::InvalidPattern { pattern, source })
}

/// With no format, any parseable date passes. With a format, the value must
/// fit the format's token positions.
pub(super) fn date(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    match args.first().map(Arg::as_text).filter(|f| !f.is_empty()) {
        Some(format) => Ok(format_regex(&format)?.is_match(text)),
        None => Ok(parse_date(text).is_some()),
    }
}

/// The comparison point: a date argument, or now.
fn reference_date(rule: &str, args: &[Arg]) -> Result<DateTime<Utc>, RuleError> {
    match args.first() {
        None => Ok(Utc::now()),
        Some(Arg::Date(d)) => Ok(*d),
        Some(Arg::Str(s)) if s.trim().is_empty() => Ok(Utc::now()),
        Some(Arg::Str(s)) => parse_date(s)
            .ok_or_else(|| RuleError::invalid_argument(rule, format!("'{s}' is not a date"))),
        Some(other) => Err(RuleError::invalid_argument(
            rule,
            format!("'{other}' is not a date"),
        )),
    }
}

fn value_date(value: &FieldValue) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_date)
}

/// Strictly later than the argument date (default: now).
pub(super) fn after(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let reference = reference_date("after", args)?;
    Ok(value_date(value).is_some_and(|d| d > reference))
}

/// Strictly earlier than the argument date (default: now).
pub(super) fn before(value: &FieldValue, args: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
    let reference = reference_date("before", args)?;
    Ok(value_date(value).is_some_and(|d| d < reference))
}
