use std::fmt;

use super::arg::Arg;

/// One parsed rule: a registry name plus its arguments, in the order given.
///
/// Rules are produced by [`parse`](crate::parse::parse),
/// [`parse_list`](crate::parse::parse_list) or [`RuleSpecBuilder`](super::RuleSpecBuilder).
/// The name is resolved against the registry at evaluation time, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    pub name: String,
    pub args: Vec<Arg>,
}

impl ParsedRule {
    pub fn new(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Whether any argument is a compiled pattern. Such rules have no
    /// string DSL form.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        self.args.iter().any(|a| matches!(a, Arg::Pattern(_)))
    }

    /// Same name and same textual arguments.
    #[must_use]
    pub fn is_equivalent(&self, other: &ParsedRule) -> bool {
        self.name == other.name
            && self.args.len() == other.args.len()
            && self
                .args
                .iter()
                .zip(&other.args)
                .all(|(a, b)| a.as_text() == b.as_text())
    }
}

impl fmt::Display for ParsedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(Arg::as_text).collect();
            write!(f, ":{}", args.join(","))?;
        }
        Ok(())
    }
}
