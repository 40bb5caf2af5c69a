use fieldcheck::{EvaluationContext, FieldValue, FormValues, RuleSpec};

fn main() {
    let spec: RuleSpec = "required|email|ends_with:.org,.com|confirm"
        .parse()
        .expect("failed to parse rule spec");

    let form = FormValues::new().set("email_confirm", "dev@example.net");
    let ctx = EvaluationContext::new("email", &form).with_label("Email address");

    let report = futures::executor::block_on(
        spec.evaluate_detailed(&FieldValue::from("dev@example.com"), &ctx),
    )
    .expect("evaluation failed");

    println!("{report}");
    println!();
    println!("Evaluation order: {:?}", report.evaluation_order());
    for outcome in report.outcomes() {
        println!("  {outcome}");
    }
    println!("Duration: {:?}", report.duration());

    let report = futures::executor::block_on(spec.evaluate_detailed(&FieldValue::Null, &ctx))
        .expect("evaluation failed");
    println!();
    println!("Empty value: {report}");
}
