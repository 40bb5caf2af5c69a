use super::text_arg;
use crate::registry::RuleResult;
use crate::{Arg, EvaluationContext, FieldValue};

const CONFIRM_SUFFIX: &str = "_confirm";

fn confirm_target(field: &str, args: &[Arg]) -> String {
    if let Some(explicit) = text_arg(args, 0) {
        return explicit;
    }
    match field.strip_suffix(CONFIRM_SUFFIX) {
        Some(base) if !base.is_empty() => base.to_owned(),
        _ => format!("{field}{CONFIRM_SUFFIX}"),
    }
}

/// Equal to the sibling `<field>_confirm`, or to the named sibling.
///
/// A field that already ends in `_confirm` is compared with its base field.
/// A missing sibling fails.
pub(super) fn confirm(value: &FieldValue, args: &[Arg], ctx: &EvaluationContext<'_>) -> RuleResult {
    let target = confirm_target(ctx.field(), args);
    Ok(ctx.sibling(&target) == Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormValues;

    #[test]
    fn password_confirmation() {
        let form = FormValues::new().set("password_confirm", "secret");
        let ctx = EvaluationContext::new("password", &form);
        assert!(confirm(&FieldValue::from("secret"), &[], &ctx).unwrap());
        assert!(!confirm(&FieldValue::from("secret1"), &[], &ctx).unwrap());
    }

    #[test]
    fn confirm_field_looks_back() {
        let form = FormValues::new().set("email", "a@b.io");
        let ctx = EvaluationContext::new("email_confirm", &form);
        assert!(confirm(&FieldValue::from("a@b.io"), &[], &ctx).unwrap());
    }

    #[test]
    fn explicit_target() {
        let form = FormValues::new().set("pin_again", 1234_i64);
        let ctx = EvaluationContext::new("pin", &form);
        assert!(confirm(&FieldValue::Int(1234), &[Arg::from("pin_again")], &ctx).unwrap());
        assert!(!confirm(&FieldValue::from("1234"), &[Arg::from("pin_again")], &ctx).unwrap());
    }

    #[test]
    fn missing_sibling_fails() {
        let ctx = EvaluationContext::standalone("password");
        assert!(!confirm(&FieldValue::from("secret"), &[], &ctx).unwrap());
    }

    #[test]
    fn target_names() {
        assert_eq!(confirm_target("password", &[]), "password_confirm");
        assert_eq!(confirm_target("password_confirm", &[]), "password");
        assert_eq!(confirm_target("_confirm", &[]), "_confirm_confirm");
        assert_eq!(confirm_target("a", &[Arg::from("b")]), "b");
    }
}
