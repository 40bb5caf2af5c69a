use winnow::combinator::{cut_err, fail, opt};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::types::slash_literal_len;
use crate::{Arg, ParsedRule};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace).void().parse_next(input)
}

fn expected<O>(input: &mut &str, what: &'static str) -> ModalResult<O> {
    cut_err(fail.context(StrContext::Expected(StrContextValue::Description(what))))
        .parse_next(input)
}

// -- Rule names -------------------------------------------------------------

pub(crate) fn rule_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

// -- Arguments --------------------------------------------------------------

/// A `/.../` literal, kept verbatim. `,` and `|` do not split inside it, and
/// a `/` inside a `[...]` class does not close it.
fn pattern_literal(input: &mut &str) -> ModalResult<String> {
    let end = match slash_literal_len(input) {
        Ok(end) => end,
        Err(missing) => {
            *input = &input[input.len()..];
            return expected(input, missing);
        }
    };

    let literal = input[..end].to_owned();
    *input = &input[end..];
    ws.parse_next(input)?;
    if !(input.is_empty() || input.starts_with([',', '|'])) {
        return expected(input, "',' or '|' after pattern");
    }
    Ok(literal)
}

fn plain_arg(input: &mut &str) -> ModalResult<String> {
    take_while(0.., |c: char| c != ',' && c != '|')
        .map(|s: &str| s.trim().to_owned())
        .parse_next(input)
}

fn arg(input: &mut &str) -> ModalResult<Arg> {
    ws.parse_next(input)?;
    if input.starts_with('/') {
        pattern_literal.map(Arg::Str).parse_next(input)
    } else {
        plain_arg.map(Arg::Str).parse_next(input)
    }
}

fn args(input: &mut &str) -> ModalResult<Vec<Arg>> {
    let mut args = vec![arg(input)?];
    while opt(',').parse_next(input)?.is_some() {
        args.push(arg(input)?);
    }
    Ok(args)
}

// -- Rules ------------------------------------------------------------------

fn rule(input: &mut &str) -> ModalResult<ParsedRule> {
    ws.parse_next(input)?;
    let name = cut_err(rule_name)
        .context(StrContext::Expected(StrContextValue::Description(
            "rule name",
        )))
        .parse_next(input)?;
    ws.parse_next(input)?;

    let args = if opt(':').parse_next(input)?.is_some() {
        args(input)?
    } else {
        Vec::new()
    };
    ws.parse_next(input)?;

    Ok(ParsedRule::new(name, args))
}

// -- Top-level parser -------------------------------------------------------

pub fn rule_spec(input: &mut &str) -> ModalResult<Vec<ParsedRule>> {
    ws.parse_next(input)?;
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut rules = vec![rule(input)?];
    while opt('|').parse_next(input)?.is_some() {
        rules.push(rule(input)?);
    }

    if !input.is_empty() {
        return expected(input, "'|' or end of input");
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use crate::parse::parse;

    use super::*;

    fn names(input: &str) -> Vec<String> {
        parse(input)
            .unwrap()
            .rules()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    fn args_of(input: &str, idx: usize) -> Vec<Arg> {
        parse(input).unwrap().rules()[idx].args.clone()
    }

    #[test]
    fn parse_single_rule() {
        assert_eq!(names("required"), vec!["required"]);
        assert!(args_of("required", 0).is_empty());
    }

    #[test]
    fn parse_pipeline_in_order() {
        assert_eq!(
            names("required|email|max:20"),
            vec!["required", "email", "max"]
        );
    }

    #[test]
    fn parse_arguments_as_strings() {
        assert_eq!(
            args_of("between:10,18", 0),
            vec![Arg::from("10"), Arg::from("18")]
        );
        assert_eq!(
            args_of("max:5,length", 0),
            vec![Arg::from("5"), Arg::from("length")]
        );
    }

    #[test]
    fn whitespace_is_trimmed() {
        let spec = parse("  required |  max : 5 , length  | email ").unwrap();
        assert_eq!(spec.rules()[0].name, "required");
        assert_eq!(spec.rules()[1].name, "max");
        assert_eq!(
            spec.rules()[1].args,
            vec![Arg::from("5"), Arg::from("length")]
        );
        assert_eq!(spec.rules()[2].name, "email");
    }

    #[test]
    fn empty_and_blank_specs() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
    }

    #[test]
    fn duplicate_rules_are_kept() {
        assert_eq!(names("min:1|min:3"), vec!["min", "min"]);
    }

    #[test]
    fn empty_argument_positions() {
        assert_eq!(
            args_of("between:,5", 0),
            vec![Arg::from(""), Arg::from("5")]
        );
        assert_eq!(args_of("in:", 0), vec![Arg::from("")]);
    }

    #[test]
    fn pattern_literal_keeps_separators() {
        assert_eq!(
            args_of("matches:/^(a|b),c$/,plain", 0),
            vec![Arg::from("/^(a|b),c$/"), Arg::from("plain")]
        );
    }

    #[test]
    fn pattern_literal_respects_classes_and_escapes() {
        assert_eq!(args_of(r"matches:/[/]+/", 0), vec![Arg::from("/[/]+/")]);
        assert_eq!(args_of(r"matches:/a\/b/", 0), vec![Arg::from(r"/a\/b/")]);
    }

    #[test]
    fn slash_inside_plain_argument_is_literal() {
        assert_eq!(args_of("date:MM/DD/YYYY", 0), vec![Arg::from("MM/DD/YYYY")]);
    }

    #[test]
    fn unterminated_pattern_is_error() {
        let err = parse("matches:/abc").unwrap_err();
        assert!(err.message().contains("'/' to close pattern"), "{err}");
    }

    #[test]
    fn unbalanced_bracket_is_error() {
        let err = parse("matches:/[abc/").unwrap_err();
        assert!(err.message().contains("']'"), "{err}");
    }

    #[test]
    fn trailing_text_after_pattern_is_error() {
        assert!(parse("matches:/a/i").is_err());
    }

    #[test]
    fn empty_rule_name_is_error() {
        assert!(parse("required||email").is_err());
        assert!(parse("required|").is_err());
        assert!(parse("|required").is_err());
        assert!(parse(":5").is_err());
    }

    #[test]
    fn invalid_rule_name_is_error() {
        assert!(parse("9lives").is_err());
        assert!(parse("max-length:5").is_err());
        assert!(parse("required email").is_err());
    }

    #[test]
    fn error_offset_points_at_failure() {
        let err = parse("required||email").unwrap_err();
        assert_eq!(err.offset(), 9);
    }

    #[test]
    fn rule_name_accepts_underscores_and_digits() {
        assert_eq!(names("starts_with:a|_x1"), vec!["starts_with", "_x1"]);
    }
}
