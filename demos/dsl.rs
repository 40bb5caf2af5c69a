use std::fs;

use fieldcheck::message::{DefaultMessages, MessageResolver};
use fieldcheck::{EvaluationContext, FieldValue, FileInfo, FormValues, RuleSpec};

fn main() {
    let source = fs::read_to_string("demos/signup.rules").expect("failed to load rules");

    let fields: Vec<(String, RuleSpec)> = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let (field, spec) = line.split_once(':').expect("expected 'field: spec'");
            let spec = spec.parse::<RuleSpec>().unwrap_or_else(|e| panic!("{field}: {e}"));
            (field.trim().to_owned(), spec)
        })
        .collect();

    let form = FormValues::new()
        .set("username", "root")
        .set("email", "dev@example.com")
        .set("password", "correct horse")
        .set("password_confirm", "correct horse battery")
        .set("age", "42")
        .set("website", "http://example.com")
        .set("avatar", vec![FileInfo::new("me.gif")]);

    let messages = DefaultMessages::new();
    for (field, spec) in &fields {
        let ctx = EvaluationContext::new(field, &form);
        let value = form.get(field).cloned().unwrap_or(FieldValue::Null);
        let result = spec
            .evaluate_blocking(&value, &ctx)
            .expect("built-in rules only");
        match result.failure() {
            None => println!("{field:<10} ok       [{spec}]"),
            Some(outcome) => println!(
                "{field:<10} invalid  [{spec}]: {}",
                messages.message(outcome, ctx.display_name())
            ),
        }
    }
}
