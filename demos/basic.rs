use fieldcheck::{EvaluationContext, FieldValue, RuleSpec};

fn main() {
    // Define rules
    let spec: RuleSpec = "required|number|between:17,120"
        .parse()
        .expect("failed to parse rule spec");

    println!("{spec}");

    // Evaluate a few values for the same field
    let ctx = EvaluationContext::standalone("age");
    for input in ["30", "12", "", "thirty"] {
        match spec.evaluate_blocking(&FieldValue::from(input), &ctx) {
            Ok(result) => println!("{input:>8?} -> {result}"),
            Err(err) => println!("{input:>8?} -> error: {err}"),
        }
    }
}
