use std::fmt;

use super::arg::Arg;
use super::context::EvaluationContext;
use super::error::EvaluationError;
use super::evaluation_report::EvaluationReport;
use super::outcome::ValidationResult;
use super::rule::ParsedRule;
use super::value::FieldValue;
use crate::parse::ParseError;
use crate::registry::{self, RuleRegistry};

/// Builder for the structured form of a [`RuleSpec`].
///
/// # Example
///
/// ```
/// use fieldcheck::{Arg, RuleSpecBuilder};
/// use regex::Regex;
///
/// let spec = RuleSpecBuilder::new()
///     .rule("required")
///     .rule_with("max", [Arg::from(20_i64), Arg::from("length")])
///     .rule_with("matches", [Arg::Pattern(Regex::new(r"^[a-z,]+$").unwrap())])
///     .build()
///     .unwrap();
///
/// assert_eq!(spec.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct RuleSpecBuilder {
    items: Vec<Vec<Arg>>,
}

impl RuleSpecBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule without arguments.
    #[must_use]
    pub fn rule(self, name: &str) -> Self {
        self.rule_with(name, [])
    }

    /// Append a rule with typed arguments.
    #[must_use]
    pub fn rule_with(mut self, name: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        let mut item = vec![Arg::from(name)];
        item.extend(args);
        self.items.push(item);
        self
    }

    /// Validate rule names and build the spec.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a rule name is empty or malformed.
    pub fn build(self) -> Result<RuleSpec, ParseError> {
        crate::parse::parse_list(self.items)
    }
}

/// An ordered sequence of rules for one field.
///
/// A spec is a pure function of its source text and can be parsed once and
/// reused for every evaluation of the field. Rule names are resolved against
/// the registry on each evaluation, not at parse time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSpec {
    rules: Vec<ParsedRule>,
}

impl RuleSpec {
    pub(crate) fn from_rules(rules: Vec<ParsedRule>) -> Self {
        Self { rules }
    }

    /// Parse the string DSL. Same as [`parse`](crate::parse::parse).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on malformed input.
    pub fn from_dsl(input: &str) -> Result<Self, ParseError> {
        crate::parse::parse(input)
    }

    #[must_use]
    pub fn rules(&self) -> &[ParsedRule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in evaluation order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Render the spec in the string DSL.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when an argument has no DSL form: compiled
    /// patterns, strings holding `,` or `|` or surrounding whitespace, and
    /// `/` strings that would not read back as one pattern literal. The
    /// offset is the index of the offending rule.
    pub fn to_dsl(&self) -> Result<String, ParseError> {
        let mut parts = Vec::with_capacity(self.rules.len());
        for (idx, rule) in self.rules.iter().enumerate() {
            let mut part = rule.name.clone();
            for (pos, arg) in rule.args.iter().enumerate() {
                let text = arg.to_dsl().ok_or_else(|| {
                    ParseError::new(
                        format!("argument '{arg}' of rule '{}' has no DSL form", rule.name),
                        idx,
                    )
                })?;
                part.push(if pos == 0 { ':' } else { ',' });
                part.push_str(&text);
            }
            parts.push(part);
        }
        Ok(parts.join("|"))
    }

    /// Same rule names, in the same order, with textually equal arguments.
    ///
    /// This is the equality that survives a trip through the string DSL,
    /// where every argument becomes a string.
    #[must_use]
    pub fn is_equivalent(&self, other: &RuleSpec) -> bool {
        self.rules.len() == other.rules.len()
            && self
                .rules
                .iter()
                .zip(&other.rules)
                .all(|(a, b)| a.is_equivalent(b))
    }

    /// Evaluate against the process-wide registry.
    ///
    /// Returns the first failing rule, or [`ValidationResult::Passed`].
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnknownRule`] if a rule is not registered, or
    /// [`EvaluationError::RuleExecution`] if a rule cannot decide.
    pub async fn evaluate(
        &self,
        value: &FieldValue,
        ctx: &EvaluationContext<'_>,
    ) -> Result<ValidationResult, EvaluationError> {
        let entries = registry::resolve(&self.rules)?;
        crate::evaluate::evaluate(&self.rules, &entries, value, ctx).await
    }

    /// Evaluate against a specific registry.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub async fn evaluate_with(
        &self,
        registry: &RuleRegistry,
        value: &FieldValue,
        ctx: &EvaluationContext<'_>,
    ) -> Result<ValidationResult, EvaluationError> {
        let entries = registry.resolve(&self.rules)?;
        crate::evaluate::evaluate(&self.rules, &entries, value, ctx).await
    }

    /// Evaluate against the process-wide registry, blocking the current
    /// thread until every rule, asynchronous ones included, has resolved.
    ///
    /// Intended for callers without an async runtime. Do not call from inside
    /// an async task.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub fn evaluate_blocking(
        &self,
        value: &FieldValue,
        ctx: &EvaluationContext<'_>,
    ) -> Result<ValidationResult, EvaluationError> {
        futures::executor::block_on(self.evaluate(value, ctx))
    }

    /// Blocking evaluation against a specific registry.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub fn evaluate_blocking_with(
        &self,
        registry: &RuleRegistry,
        value: &FieldValue,
        ctx: &EvaluationContext<'_>,
    ) -> Result<ValidationResult, EvaluationError> {
        futures::executor::block_on(self.evaluate_with(registry, value, ctx))
    }

    /// Evaluate with diagnostics against the process-wide registry.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub async fn evaluate_detailed(
        &self,
        value: &FieldValue,
        ctx: &EvaluationContext<'_>,
    ) -> Result<EvaluationReport, EvaluationError> {
        let entries = registry::resolve(&self.rules)?;
        crate::evaluate::evaluate_detailed(&self.rules, &entries, value, ctx).await
    }

    /// Evaluate with diagnostics against a specific registry.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub async fn evaluate_detailed_with(
        &self,
        registry: &RuleRegistry,
        value: &FieldValue,
        ctx: &EvaluationContext<'_>,
    ) -> Result<EvaluationReport, EvaluationError> {
        let entries = registry.resolve(&self.rules)?;
        crate::evaluate::evaluate_detailed(&self.rules, &entries, value, ctx).await
    }
}

impl std::str::FromStr for RuleSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse(s)
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.rules.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("|"))
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::{Deserializer, Error as _};
    use serde::{Deserialize, Serialize, Serializer};

    use super::{Arg, RuleSpec};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Source {
        Dsl(String),
        List(Vec<Vec<Arg>>),
    }

    impl<'de> Deserialize<'de> for RuleSpec {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let parsed = match Source::deserialize(deserializer)? {
                Source::Dsl(s) => crate::parse::parse(&s),
                Source::List(items) => crate::parse::parse_list(items),
            };
            parsed.map_err(D::Error::custom)
        }
    }

    impl Serialize for RuleSpec {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let items: Vec<Vec<Arg>> = self
                .rules
                .iter()
                .map(|r| {
                    let mut item = vec![Arg::from(r.name.as_str())];
                    item.extend(r.args.iter().cloned());
                    item
                })
                .collect();
            items.serialize(serializer)
        }
    }
}
