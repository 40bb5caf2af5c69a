use std::time::Duration;

use async_trait::async_trait;
use fieldcheck::message::{DefaultMessages, MessageResolver};
use fieldcheck::registry::{self, AsyncRule, RuleResult};
use fieldcheck::{Arg, EvaluationContext, FieldValue, RuleSpec, Sequencer};
use tracing_subscriber::EnvFilter;

/// Stands in for a call to an account service.
struct UsernameAvailable;

#[async_trait]
impl AsyncRule for UsernameAvailable {
    async fn check(&self, value: &FieldValue, _: &[Arg], _: &EvaluationContext<'_>) -> RuleResult {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let taken = ["admin", "alice", "bob"];
        Ok(value.as_str().is_some_and(|name| !taken.contains(&name)))
    }
}

#[tokio::main]
async fn main() {
    // RUST_LOG=fieldcheck=trace shows every rule as it runs.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    registry::register_async("username_available", UsernameAvailable);
    registry::register("no_spaces", |value, _, _| {
        Ok(value.as_str().is_some_and(|s| !s.contains(' ')))
    });

    let spec: RuleSpec = "required|no_spaces|min:3,length|username_available"
        .parse()
        .expect("failed to parse rule spec");
    let messages = DefaultMessages::new()
        .with_message("username_available", |_, name| format!("{name} is already taken."))
        .with_message("no_spaces", |_, name| format!("{name} cannot contain spaces."));

    let ctx = EvaluationContext::standalone("username").with_label("username");
    for input in ["carol", "alice", "a b", "", "xy"] {
        let result = spec
            .evaluate(&FieldValue::from(input), &ctx)
            .await
            .expect("rules are registered");
        match result.failure() {
            None => println!("{input:?}: ok"),
            Some(outcome) => println!("{input:?}: {}", messages.message(outcome, ctx.display_name())),
        }
    }

    // Keystrokes arriving faster than the check resolves: only the newest
    // input's result is kept.
    let seq = Sequencer::new();
    let typed = ["ali", "alic", "alice"];
    let tickets: Vec<_> = typed.iter().map(|_| seq.begin()).collect();
    let checks = typed.iter().map(|input| {
        let value = FieldValue::from(*input);
        let spec = &spec;
        let ctx = &ctx;
        async move { spec.evaluate(&value, ctx).await }
    });
    let results = futures::future::join_all(checks).await;
    for ((input, ticket), result) in typed.iter().zip(tickets).zip(results) {
        match seq.accept(ticket, result) {
            Some(result) => println!("{input:?}: kept {result:?}"),
            None => println!("{input:?}: stale, discarded"),
        }
    }
}
