//! The built-in rule library.
//!
//! Every rule is a pure function of `(value, args, context)`. Arguments come
//! in already padded with the registry defaults; each rule coerces its own
//! arguments and reports malformed ones as [`RuleError::InvalidArgument`].

mod cross_field;
mod dates;
mod files;
mod format;
mod membership;
mod presence;
mod size;

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use regex::Regex;

use crate::registry::{RuleEntry, RuleRegistry};
use crate::{Arg, RuleError};

const PATTERN_CACHE_LIMIT: usize = 256;

/// Register every built-in rule into `registry`.
pub(crate) fn register_builtins(registry: &mut RuleRegistry) {
    registry.insert(
        RuleEntry::new("required", presence::required)
            .with_defaults(vec![Arg::Bool(true)])
            .runs_when_empty_if(presence::required_enabled),
    );
    registry.insert(RuleEntry::new("accepted", presence::accepted).runs_when_empty());

    registry.insert(
        RuleEntry::new("between", size::between)
            .with_defaults(vec![Arg::Number(0.0), Arg::Number(10.0)]),
    );
    registry.insert(RuleEntry::new("max", size::max).with_defaults(vec![Arg::Number(10.0)]));
    registry.insert(RuleEntry::new("min", size::min).with_defaults(vec![Arg::Number(1.0)]));

    registry.insert(RuleEntry::new("in", membership::in_set));
    registry.insert(RuleEntry::new("not", membership::not_in_set));
    registry.insert(RuleEntry::new("matches", membership::matches));

    registry.insert(
        RuleEntry::new("alpha", format::alpha).with_defaults(vec![Arg::from("default")]),
    );
    registry.insert(
        RuleEntry::new("alphanumeric", format::alphanumeric)
            .with_defaults(vec![Arg::from("default")]),
    );
    registry.insert(RuleEntry::new("email", format::email));
    registry.insert(RuleEntry::new("number", format::number));
    registry.insert(RuleEntry::new("url", format::url));
    registry.insert(RuleEntry::new("starts_with", format::starts_with));
    registry.insert(RuleEntry::new("ends_with", format::ends_with));

    registry.insert(RuleEntry::new("date", dates::date));
    registry.insert(RuleEntry::new("after", dates::after));
    registry.insert(RuleEntry::new("before", dates::before));

    registry.insert(RuleEntry::new("mime", files::mime));

    registry.insert(RuleEntry::new("confirm", cross_field::confirm));
}

/// Required numeric argument at `idx`.
fn number_arg(rule: &str, args: &[Arg], idx: usize) -> Result<f64, RuleError> {
    let arg = args
        .get(idx)
        .ok_or_else(|| RuleError::invalid_argument(rule, format!("missing argument {}", idx + 1)))?;
    arg.as_number()
        .ok_or_else(|| RuleError::invalid_argument(rule, format!("'{arg}' is not a number")))
}

/// Optional argument at `idx` as text; empty strings count as absent.
fn text_arg(args: &[Arg], idx: usize) -> Option<String> {
    args.get(idx).map(Arg::as_text).filter(|s| !s.is_empty())
}

fn pattern_cache() -> &'static RwLock<HashMap<String, Regex>> {
    static CACHE: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

/// Compile `source`, reusing an earlier compilation of the same source.
/// Failed compilations are not cached.
fn cached_regex(source: &str) -> Result<Regex, regex::Error> {
    if let Some(re) = pattern_cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(source)
    {
        return Ok(re.clone());
    }

    let re = Regex::new(source)?;
    let mut cache = pattern_cache()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if cache.len() >= PATTERN_CACHE_LIMIT {
        cache.clear();
    }
    cache.insert(source.to_owned(), re.clone());
    Ok(re)
}
