use std::sync::Arc;
use std::thread;

use fieldcheck::{EvaluationContext, FieldValue, RuleSpec};

fn main() {
    let spec = Arc::new(
        "required|number|min:18"
            .parse::<RuleSpec>()
            .expect("failed to parse rule spec"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let spec = Arc::clone(&spec);
            thread::spawn(move || {
                let age = FieldValue::Int(16 + i64::from(i));
                let ctx = EvaluationContext::standalone("age");
                let result = spec.evaluate_blocking(&age, &ctx);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
