mod strategies;

use fieldcheck::{EvaluationContext, FieldValue, RuleRegistry, RuleSpec, ValidationResult};
use proptest::prelude::*;
use strategies::{arb_empty_value, arb_optional_spec, arb_spec, arb_value};

fn eval(registry: &RuleRegistry, spec: &RuleSpec, value: &FieldValue) -> ValidationResult {
    let ctx = EvaluationContext::standalone("field");
    spec.evaluate_blocking_with(registry, value, &ctx)
        .expect("pool rules never error")
}

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// The same spec, value and context always produce the same result.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn determinism(spec_def in arb_spec(), value in arb_value()) {
        let registry = RuleRegistry::with_builtins();
        let spec = spec_def.build();
        let first = eval(&registry, &spec, &value);
        for _ in 0..3 {
            prop_assert_eq!(&first, &eval(&registry, &spec, &value));
        }
    }

    #[test]
    fn determinism_reparse(spec_def in arb_spec(), value in arb_value()) {
        let registry = RuleRegistry::with_builtins();
        let a = eval(&registry, &spec_def.build(), &value);
        let b = eval(&registry, &spec_def.build(), &value);
        prop_assert_eq!(a, b);
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Empty values skip optional rules
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn empty_value_passes_without_required(spec_def in arb_optional_spec(), value in arb_empty_value()) {
        let registry = RuleRegistry::with_builtins();
        prop_assert!(eval(&registry, &spec_def.build(), &value).is_passed());
    }

    #[test]
    fn empty_value_fails_required(spec_def in arb_optional_spec(), value in arb_empty_value()) {
        let registry = RuleRegistry::with_builtins();
        let spec: RuleSpec = format!("required|{}", spec_def.dsl()).trim_end_matches('|').parse().unwrap();
        let result = eval(&registry, &spec, &value);
        prop_assert_eq!(result.failed_rule(), Some("required"));
    }

    #[test]
    fn empty_value_passes_with_required_off(spec_def in arb_optional_spec(), value in arb_empty_value()) {
        let registry = RuleRegistry::with_builtins();
        let spec: RuleSpec = format!("required:false|{}", spec_def.dsl()).trim_end_matches('|').parse().unwrap();
        prop_assert!(eval(&registry, &spec, &value).is_passed());
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Ordered short-circuit
//
// Every rule before the failing one passed, nothing after it ran, and the
// failing rule is the first one that fails on its own.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn first_failure_wins(spec_def in arb_spec(), value in arb_value()) {
        let registry = RuleRegistry::with_builtins();
        let spec = spec_def.build();
        let ctx = EvaluationContext::standalone("field");
        let report = futures::executor::block_on(spec.evaluate_detailed_with(&registry, &value, &ctx)).unwrap();

        if report.skipped_empty() {
            prop_assert!(report.outcomes().is_empty());
            prop_assert!(report.result().is_passed());
            return Ok(());
        }

        let names = spec.rule_names();
        let ran = report.evaluation_order();
        prop_assert_eq!(&names[..ran.len()], &ran[..]);

        match report.result() {
            ValidationResult::Passed => {
                prop_assert_eq!(ran.len(), names.len());
                prop_assert!(report.outcomes().iter().all(|o| o.passed()));
            }
            ValidationResult::Failed(failure) => {
                let (last, before) = report.outcomes().split_last().unwrap();
                prop_assert_eq!(last, failure);
                prop_assert!(before.iter().all(|o| o.passed()));
            }
        }
    }

    #[test]
    fn verdict_is_order_independent(spec_def in arb_spec(), value in arb_value()) {
        // Which rule fails may change with order; whether one fails may not.
        let registry = RuleRegistry::with_builtins();
        let forward = eval(&registry, &spec_def.build(), &value);
        let backward = eval(&registry, &spec_def.reversed().build(), &value);
        prop_assert_eq!(forward.is_passed(), backward.is_passed());
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: DSL round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn dsl_round_trip(spec_def in arb_spec()) {
        let spec = spec_def.build();
        prop_assert_eq!(spec.len(), spec_def.rules.len());
        let text = spec.to_dsl().unwrap();
        prop_assert_eq!(&text, &spec_def.dsl());
        let reparsed: RuleSpec = text.parse().unwrap();
        prop_assert!(reparsed.is_equivalent(&spec));
    }
}
