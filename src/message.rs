//! Turning a failed [`RuleOutcome`] into a human-facing message.
//!
//! Evaluation never produces text. Callers that want messages pass the
//! failure and the field's display name to a [`MessageResolver`] once
//! evaluation is done.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{Arg, RuleOutcome};

/// Maps a failed rule to a message for the given display name.
pub trait MessageResolver: Send + Sync {
    fn message(&self, outcome: &RuleOutcome, display_name: &str) -> String;
}

type Template = Arc<dyn Fn(&RuleOutcome, &str) -> String + Send + Sync>;

/// English messages for the built-in rules, with per-rule overrides.
///
/// ```
/// use fieldcheck::message::{DefaultMessages, MessageResolver};
/// use fieldcheck::{Arg, RuleOutcome};
///
/// let messages = DefaultMessages::new()
///     .with_message("email", |_, name| format!("{name} needs an @ sign."));
/// let failed = RuleOutcome::new("email", vec![], false);
/// assert_eq!(messages.message(&failed, "Email"), "Email needs an @ sign.");
///
/// let failed = RuleOutcome::new("max", vec![Arg::from("5")], false);
/// assert_eq!(messages.message(&failed, "age"), "Age must be at most 5.");
/// ```
#[derive(Clone, Default)]
pub struct DefaultMessages {
    overrides: HashMap<String, Template>,
}

impl DefaultMessages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the message for `rule`. Also works for custom rule names.
    #[must_use]
    pub fn with_message<F>(mut self, rule: &str, template: F) -> Self
    where
        F: Fn(&RuleOutcome, &str) -> String + Send + Sync + 'static,
    {
        self.overrides.insert(rule.to_owned(), Arc::new(template));
        self
    }
}

impl fmt::Debug for DefaultMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
        rules.sort_unstable();
        f.debug_struct("DefaultMessages")
            .field("overrides", &rules)
            .finish()
    }
}

impl MessageResolver for DefaultMessages {
    fn message(&self, outcome: &RuleOutcome, display_name: &str) -> String {
        if let Some(template) = self.overrides.get(outcome.rule_name()) {
            return template(outcome, display_name);
        }
        builtin_message(outcome, &capitalize(display_name))
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn arg(args: &[Arg], idx: usize) -> Option<String> {
    args.get(idx).map(Arg::as_text).filter(|s| !s.is_empty())
}

fn listed(args: &[Arg]) -> String {
    args.iter()
        .map(Arg::as_text)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn unit(args: &[Arg], mode_idx: usize) -> &'static str {
    match arg(args, mode_idx).as_deref() {
        Some("length") => " characters",
        _ => "",
    }
}

fn builtin_message(outcome: &RuleOutcome, name: &str) -> String {
    let args = outcome.args();
    match outcome.rule_name() {
        "required" => format!("{name} is required."),
        "accepted" => format!("{name} must be accepted."),
        "alpha" => format!("{name} may only contain letters."),
        "alphanumeric" => format!("{name} may only contain letters and numbers."),
        "between" => format!(
            "{name} must be between {} and {}{}.",
            arg(args, 0).unwrap_or_default(),
            arg(args, 1).unwrap_or_default(),
            unit(args, 2)
        ),
        "max" => format!(
            "{name} must be at most {}{}.",
            arg(args, 0).unwrap_or_default(),
            unit(args, 1)
        ),
        "min" => format!(
            "{name} must be at least {}{}.",
            arg(args, 0).unwrap_or_default(),
            unit(args, 1)
        ),
        "confirm" => format!("{name} does not match its confirmation."),
        "date" => match arg(args, 0) {
            Some(format) => format!("{name} must be a date formatted as {format}."),
            None => format!("{name} must be a valid date."),
        },
        "after" => match arg(args, 0) {
            Some(date) => format!("{name} must be after {date}."),
            None => format!("{name} must be in the future."),
        },
        "before" => match arg(args, 0) {
            Some(date) => format!("{name} must be before {date}."),
            None => format!("{name} must be in the past."),
        },
        "email" => format!("{name} must be a valid email address."),
        "in" => format!("{name} must be one of: {}.", listed(args)),
        "not" | "matches" => format!("{name} is not an allowed value."),
        "mime" => format!("{name} must be a file of type: {}.", listed(args)),
        "number" => format!("{name} must be a number."),
        "url" => format!("{name} must be a valid URL."),
        "starts_with" => format!("{name} must start with one of: {}.", listed(args)),
        "ends_with" => format!("{name} must end with one of: {}.", listed(args)),
        _ => format!("{name} is invalid."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(rule: &str, args: &[&str]) -> RuleOutcome {
        RuleOutcome::new(rule, args.iter().map(|s| Arg::from(*s)).collect(), false)
    }

    #[test]
    fn builtin_messages_use_args() {
        let m = DefaultMessages::new();
        assert_eq!(m.message(&failed("required", &["true"]), "email"), "Email is required.");
        assert_eq!(
            m.message(&failed("between", &["10", "18"]), "age"),
            "Age must be between 10 and 18."
        );
        assert_eq!(
            m.message(&failed("max", &["5", "length"]), "Nickname"),
            "Nickname must be at most 5 characters."
        );
        assert_eq!(
            m.message(&failed("in", &["red", "green"]), "colour"),
            "Colour must be one of: red, green."
        );
        assert_eq!(m.message(&failed("after", &[]), "start"), "Start must be in the future.");
    }

    #[test]
    fn numeric_args_render_plainly() {
        let m = DefaultMessages::new();
        let outcome = RuleOutcome::new("max", vec![Arg::Number(10.0)], false);
        assert_eq!(m.message(&outcome, "Bio"), "Bio must be at most 10.");
    }

    #[test]
    fn unknown_rule_falls_back() {
        let m = DefaultMessages::new();
        assert_eq!(m.message(&failed("username_free", &[]), "username"), "Username is invalid.");
        assert_eq!(m.message(&failed("custom", &[]), ""), " is invalid.");
    }

    #[test]
    fn override_replaces_default() {
        let m = DefaultMessages::new()
            .with_message("required", |_, name| format!("Please fill in {name}."))
            .with_message("username_free", |o, name| {
                format!("{name} failed {}.", o.rule_name())
            });
        assert_eq!(m.message(&failed("required", &[]), "email"), "Please fill in email.");
        assert_eq!(
            m.message(&failed("username_free", &[]), "Login"),
            "Login failed username_free."
        );
        assert_eq!(m.message(&failed("email", &[]), "email"), "Email must be a valid email address.");
    }

    #[test]
    fn usable_as_trait_object() {
        let resolver: Box<dyn MessageResolver> = Box::new(DefaultMessages::new());
        assert_eq!(resolver.message(&failed("number", &[]), "qty"), "Qty must be a number.");
    }
}
