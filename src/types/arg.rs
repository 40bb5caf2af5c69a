use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;

use super::value::{parse_number, FieldValue};

/// A single rule argument.
///
/// Arguments parsed from the string DSL are always [`Arg::Str`]; the other
/// variants only arrive through the structured-list form.
#[derive(Debug, Clone)]
pub enum Arg {
    Str(String),
    Number(f64),
    Bool(bool),
    /// A compiled regular expression. Has no DSL string form.
    Pattern(Regex),
    /// A point in time, for `after` / `before`.
    Date(DateTime<Utc>),
}

impl Arg {
    /// Numeric view: numbers as-is, numeric strings coerced.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Arg::Number(n) if n.is_finite() => Some(*n),
            Arg::Str(s) => parse_number(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view: `Bool`, or the strings `true`/`false`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Arg::Bool(b) => Some(*b),
            Arg::Str(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Canonical text of the argument. Patterns render as `/source/`.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Arg::Str(s) => s.clone(),
            Arg::Number(n) => n.to_string(),
            Arg::Bool(b) => b.to_string(),
            Arg::Pattern(re) => format!("/{}/", re.as_str()),
            Arg::Date(d) => d.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }

    /// The DSL string form of this argument, or `None` when it cannot be
    /// written in the string DSL without changing its meaning.
    #[must_use]
    pub fn to_dsl(&self) -> Option<String> {
        match self {
            Arg::Pattern(_) => None,
            Arg::Str(s) if s.starts_with('/') => {
                (slash_literal_len(s) == Ok(s.len())).then(|| s.clone())
            }
            Arg::Str(s) => {
                let splits = s.contains([',', '|']);
                let padded = s.trim() != s;
                (!splits && !padded).then(|| s.clone())
            }
            other => Some(other.as_text()),
        }
    }

    /// Loose equality against a field value, used by membership rules.
    ///
    /// Same-kind scalars compare directly, numbers compare numerically with
    /// numeric strings and booleans compare with `"true"` / `"false"`.
    #[must_use]
    pub fn loosely_equals(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Arg::Str(a), FieldValue::String(b)) => a == b,
            (Arg::Str(_) | Arg::Number(_), FieldValue::Int(_) | FieldValue::Float(_))
            | (Arg::Number(_), FieldValue::String(_)) => {
                match (self.as_number(), value.as_number()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (Arg::Bool(a), FieldValue::Bool(b)) => a == b,
            (Arg::Str(a), FieldValue::Bool(b)) => a == if *b { "true" } else { "false" },
            (Arg::Bool(a), FieldValue::String(b)) => b == if *a { "true" } else { "false" },
            _ => false,
        }
    }
}

/// Whether `s` is a slash-delimited pattern literal such as `/^\d+$/`.
#[must_use]
pub fn is_slash_literal(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('/') && s.ends_with('/')
}

/// Byte length of the `/.../` literal at the start of `s`: up to the first
/// unescaped `/` outside a `[...]` class. On failure, says what is missing.
pub(crate) fn slash_literal_len(s: &str) -> Result<usize, &'static str> {
    let mut depth = 0_usize;
    let mut escaped = false;

    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            '/' if depth == 0 => return Ok(i + 1),
            _ => {}
        }
    }

    Err(if depth > 0 {
        "']' to close character class"
    } else {
        "'/' to close pattern"
    })
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Arg::Str(a), Arg::Str(b)) => a == b,
            (Arg::Number(a), Arg::Number(b)) => a == b,
            (Arg::Bool(a), Arg::Bool(b)) => a == b,
            (Arg::Pattern(a), Arg::Pattern(b)) => a.as_str() == b.as_str(),
            (Arg::Date(a), Arg::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Str(v.to_owned())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Str(v)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Number(v)
    }
}

impl From<i64> for Arg {
    #[allow(clippy::cast_precision_loss)]
    fn from(v: i64) -> Self {
        Arg::Number(v as f64)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Number(f64::from(v))
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<Regex> for Arg {
    fn from(v: Regex) -> Self {
        Arg::Pattern(v)
    }
}

impl From<DateTime<Utc>> for Arg {
    fn from(v: DateTime<Utc>) -> Self {
        Arg::Date(v)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::{self, Deserializer, Visitor};
    use serde::{Serialize, Serializer};

    use super::Arg;

    impl Serialize for Arg {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Arg::Str(s) => serializer.serialize_str(s),
                Arg::Number(n) => serializer.serialize_f64(*n),
                Arg::Bool(b) => serializer.serialize_bool(*b),
                other => serializer.serialize_str(&other.as_text()),
            }
        }
    }

    struct ArgVisitor;

    impl Visitor<'_> for ArgVisitor {
        type Value = Arg;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a string, number or boolean rule argument")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Arg, E> {
            Ok(Arg::Bool(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Arg, E> {
            Ok(Arg::from(v))
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Arg, E> {
            Ok(Arg::Number(v as f64))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Arg, E> {
            Ok(Arg::Number(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Arg, E> {
            Ok(Arg::from(v))
        }
    }

    impl<'de> serde::Deserialize<'de> for Arg {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(ArgVisitor)
        }
    }
}
