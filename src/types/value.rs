use std::collections::BTreeMap;
use std::fmt;

/// Metadata for an uploaded file, as supplied by the host form layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileInfo {
    /// The file name, including its extension.
    pub name: String,
    /// The mime type reported by the host, if any.
    pub mime: Option<String>,
}

impl FileInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: None,
        }
    }

    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// A field value under validation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    /// No value was provided.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    /// A set of uploaded files.
    Files(Vec<FileInfo>),
}

impl FieldValue {
    /// The uniform emptiness predicate.
    ///
    /// `Null`, the empty string and empty collections are empty. Numeric zero
    /// and `false` are values like any other and are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::String(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Map(map) => map.is_empty(),
            FieldValue::Files(files) => files.is_empty(),
            FieldValue::Bool(_) | FieldValue::Int(_) | FieldValue::Float(_) => false,
        }
    }

    /// Numeric view of the value. Numeric strings are coerced; anything else
    /// (including booleans) is `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) if !v.is_nan() => Some(*v),
            FieldValue::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Textual view of a scalar value. Collections have no textual form.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Int(v) => Some(v.to_string()),
            FieldValue::Float(v) => Some(v.to_string()),
            FieldValue::Bool(v) => Some(v.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Element count for collection values.
    #[must_use]
    pub fn collection_len(&self) -> Option<usize> {
        match self {
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Map(map) => Some(map.len()),
            FieldValue::Files(files) => Some(files.len()),
            _ => None,
        }
    }
}

/// Parse a trimmed, non-empty numeric string into a finite `f64`.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(v: Vec<FieldValue>) -> Self {
        FieldValue::List(v)
    }
}

impl From<Vec<FileInfo>> for FieldValue {
    fn from(v: Vec<FileInfo>) -> Self {
        FieldValue::Files(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::String(v) => write!(f, "\"{v}\""),
            FieldValue::List(items) => write!(f, "[{} items]", items.len()),
            FieldValue::Map(map) => write!(f, "{{{} keys}}", map.len()),
            FieldValue::Files(files) => write!(f, "[{} files]", files.len()),
        }
    }
}
