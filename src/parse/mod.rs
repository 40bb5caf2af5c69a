mod error;
mod grammar;

pub use error::ParseError;

use crate::{Arg, ParsedRule, RuleSpec};

/// Parse a pipe-delimited DSL string such as `"required|max:5,length"` into a
/// [`RuleSpec`].
///
/// All arguments come out as [`Arg::Str`]; coercion is left to the rules.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax.
pub fn parse(input: &str) -> Result<RuleSpec, ParseError> {
    use winnow::Parser;
    grammar::rule_spec
        .parse(input)
        .map(RuleSpec::from_rules)
        .map_err(|e| ParseError::new(e.inner().to_string(), e.offset()))
}

/// Parse the structured-list form: each item is `[name, args...]`, with the
/// arguments passed through as typed values.
///
/// # Errors
///
/// Returns [`ParseError`] if an item is empty or its first element is not a
/// valid rule name. The error offset is the index of the offending item.
pub fn parse_list<I, R>(items: I) -> Result<RuleSpec, ParseError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = Arg>,
{
    let mut rules = Vec::new();
    for (idx, item) in items.into_iter().enumerate() {
        let mut parts = item.into_iter();
        let name = match parts.next() {
            Some(Arg::Str(name)) => name.trim().to_owned(),
            Some(other) => {
                return Err(ParseError::new(
                    format!("rule name must be a string, got '{other}'"),
                    idx,
                ));
            }
            None => return Err(ParseError::new("empty rule", idx)),
        };
        if !is_rule_name(&name) {
            return Err(ParseError::new(format!("invalid rule name '{name}'"), idx));
        }
        rules.push(ParsedRule::new(name, parts.collect()));
    }
    Ok(RuleSpec::from_rules(rules))
}

/// Either surface syntax of a rule specification.
#[derive(Debug, Clone)]
pub enum RuleSource {
    Dsl(String),
    List(Vec<Vec<Arg>>),
}

impl RuleSource {
    /// Parse whichever form this is.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on malformed input.
    pub fn parse(&self) -> Result<RuleSpec, ParseError> {
        match self {
            RuleSource::Dsl(s) => parse(s),
            RuleSource::List(items) => parse_list(items.iter().cloned()),
        }
    }
}

impl From<&str> for RuleSource {
    fn from(v: &str) -> Self {
        RuleSource::Dsl(v.to_owned())
    }
}

impl From<String> for RuleSource {
    fn from(v: String) -> Self {
        RuleSource::Dsl(v)
    }
}

impl From<Vec<Vec<Arg>>> for RuleSource {
    fn from(v: Vec<Vec<Arg>>) -> Self {
        RuleSource::List(v)
    }
}

pub(crate) fn is_rule_name(name: &str) -> bool {
    use winnow::Parser;
    grammar::rule_name.parse(name).is_ok()
}
