#![allow(dead_code)]

use fieldcheck::{FieldValue, RuleSpec};
use proptest::prelude::*;

// --- Rule pool ---
// Only built-ins whose arguments are generated well-formed, so no rule ever
// errors and every evaluation ends in Passed or Failed.

const WORDS: &[&str] = &["red", "green", "blue", "a", "b", "ab", "42", "7"];

/// A generated rule: name plus DSL-safe textual arguments.
#[derive(Debug, Clone)]
pub struct GenRule {
    pub name: &'static str,
    pub args: Vec<String>,
}

impl GenRule {
    fn new(name: &'static str, args: Vec<String>) -> Self {
        Self { name, args }
    }

    pub fn is_required_class(&self) -> bool {
        matches!(self.name, "required" | "accepted")
    }

    fn dsl(&self) -> String {
        if self.args.is_empty() {
            self.name.to_owned()
        } else {
            format!("{}:{}", self.name, self.args.join(","))
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenSpec {
    pub rules: Vec<GenRule>,
}

impl GenSpec {
    pub fn dsl(&self) -> String {
        self.rules
            .iter()
            .map(GenRule::dsl)
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn build(&self) -> RuleSpec {
        self.dsl().parse().expect("generated DSL parses")
    }

    pub fn has_required_class(&self) -> bool {
        self.rules.iter().any(GenRule::is_required_class)
    }

    pub fn reversed(&self) -> GenSpec {
        let mut rules = self.rules.clone();
        rules.reverse();
        GenSpec { rules }
    }
}

fn arb_word() -> impl Strategy<Value = String> {
    prop::sample::select(WORDS).prop_map(str::to_owned)
}

fn arb_words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_word(), 1..4)
}

fn arb_optional_rule() -> impl Strategy<Value = GenRule> {
    prop_oneof![
        Just(GenRule::new("email", vec![])),
        Just(GenRule::new("number", vec![])),
        Just(GenRule::new("url", vec![])),
        prop::sample::select(&["default", "latin"][..])
            .prop_map(|set| GenRule::new("alpha", vec![set.to_owned()])),
        Just(GenRule::new("alphanumeric", vec![])),
        (0_u32..20).prop_map(|n| GenRule::new("max", vec![n.to_string()])),
        (0_u32..20).prop_map(|n| GenRule::new("min", vec![n.to_string()])),
        (0_u32..10, 1_u32..10)
            .prop_map(|(lo, span)| GenRule::new("between", vec![lo.to_string(), (lo + span).to_string()])),
        (0_u32..20, prop::bool::ANY).prop_map(|(n, by_len)| {
            let mode = if by_len { "length" } else { "value" };
            GenRule::new("max", vec![n.to_string(), mode.to_owned()])
        }),
        arb_words().prop_map(|w| GenRule::new("in", w)),
        arb_words().prop_map(|w| GenRule::new("not", w)),
        arb_words().prop_map(|w| GenRule::new("starts_with", w)),
        arb_words().prop_map(|w| GenRule::new("ends_with", w)),
    ]
}

fn arb_rule() -> impl Strategy<Value = GenRule> {
    prop_oneof![
        4 => arb_optional_rule(),
        1 => Just(GenRule::new("required", vec![])),
        1 => Just(GenRule::new("accepted", vec![])),
    ]
}

/// Specs made only of rules that skip empty values.
pub fn arb_optional_spec() -> impl Strategy<Value = GenSpec> {
    prop::collection::vec(arb_optional_rule(), 0..6).prop_map(|rules| GenSpec { rules })
}

/// Any spec from the pool, `required` and `accepted` included.
pub fn arb_spec() -> impl Strategy<Value = GenSpec> {
    prop::collection::vec(arb_rule(), 0..6).prop_map(|rules| GenSpec { rules })
}

/// The values `FieldValue::is_empty` treats as absent.
pub fn arb_empty_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        Just(FieldValue::Null),
        Just(FieldValue::from("")),
        Just(FieldValue::List(vec![])),
        Just(FieldValue::Files(vec![])),
    ]
}

pub fn arb_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        arb_empty_value(),
        "[a-z0-9@.:/]{0,16}".prop_map(FieldValue::from),
        arb_word().prop_map(FieldValue::from),
        (-50_i64..50).prop_map(FieldValue::Int),
        any::<bool>().prop_map(FieldValue::Bool),
        prop::collection::vec(arb_word().prop_map(FieldValue::from), 0..4).prop_map(FieldValue::List),
    ]
}
