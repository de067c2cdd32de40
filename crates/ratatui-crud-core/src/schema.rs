//! Declarative form schemas.
//!
//! A [`FormSchema`] is the JSON-Schema-shaped subset the table widget hands
//! to a form renderer: a required-field list plus ordered properties with a
//! type, a display title, optional enumerated choices, and an optional
//! default. Schemas are plain values; the widget builds a fresh one per
//! modal open and never mutates a caller's template.

use serde_json::Map;
use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldType {
    #[default]
    String,
    Number,
}

/// One editable field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSpec {
    pub field_type: FieldType,
    pub title: String,
    pub enum_values: Option<Vec<String>>,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn string(title: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::String,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn number(title: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::Number,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_enum(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// An ordered set of editable fields plus the names that must be filled in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormSchema {
    pub required: Vec<String>,
    pub properties: Vec<(String, FieldSpec)>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.properties.push((name.into(), spec));
        self
    }

    pub fn require(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Returns a copy of `template` whose property defaults are taken from
/// `row`, keyed by property name. Properties with no matching row field keep
/// the template's default.
///
/// The template is not touched, so two edit-opens on different rows can
/// never see each other's defaults.
pub fn with_row_defaults(template: &FormSchema, row: &Map<String, Value>) -> FormSchema {
    let properties = template
        .properties
        .iter()
        .map(|(name, spec)| {
            let mut spec = spec.clone();
            if let Some(value) = row.get(name) {
                spec.default = Some(value.clone());
            }
            (name.clone(), spec)
        })
        .collect();

    FormSchema {
        required: template.required.clone(),
        properties,
    }
}

/// Coerces a raw field value to its display form: strings verbatim, numbers
/// and booleans via their display representation, null as empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
