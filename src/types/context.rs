use std::collections::HashMap;

use super::FieldValue;

/// Flat mapping of field names to their current values for one form.
///
/// This is the data cross-field rules such as `confirm` look into. The form
/// layer owns it; evaluation only ever borrows it.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    values: HashMap<String, FieldValue>,
}

impl FormValues {
    /// Create an empty set of form values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, builder style.
    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value.into());
        self
    }

    /// Insert a field value (mutable reference version).
    pub fn insert(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

static NO_VALUES: std::sync::OnceLock<FormValues> = std::sync::OnceLock::new();

/// Read-only view available to rules during one evaluation.
///
/// Holds the name of the field under validation, an optional display label
/// and a borrowed view of the sibling values. Rules can read it but never
/// mutate it.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    field: &'a str,
    label: Option<&'a str>,
    form: &'a FormValues,
}

impl<'a> EvaluationContext<'a> {
    /// A context for `field` with access to the given sibling values.
    #[must_use]
    pub fn new(field: &'a str, form: &'a FormValues) -> Self {
        Self {
            field,
            label: None,
            form,
        }
    }

    /// A context for a standalone field with no siblings.
    #[must_use]
    pub fn standalone(field: &'a str) -> Self {
        Self::new(field, NO_VALUES.get_or_init(FormValues::new))
    }

    /// Attach a human-facing label. Only used for message formatting.
    #[must_use]
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Name of the field under validation.
    #[must_use]
    pub fn field(&self) -> &'a str {
        self.field
    }

    /// The label if one was given, otherwise the field name.
    #[must_use]
    pub fn display_name(&self) -> &'a str {
        self.label.unwrap_or(self.field)
    }

    /// Look up a sibling field's value.
    #[must_use]
    pub fn sibling(&self, name: &str) -> Option<&'a FieldValue> {
        self.form.get(name)
    }

    #[must_use]
    pub fn form(&self) -> &'a FormValues {
        self.form
    }
}
