//! Declarative form schemas
//!
//! A [`FormSchema`] describes the fields of one wizard form: name,
//! required flag, default value, and a selector telling the frontend how
//! to render it. The schema also validates submitted input, so flow
//! handlers only ever see well-formed values.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Validation errors for submitted form input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("required field missing: {0}")]
    MissingField(String),

    #[error("unexpected field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: expected {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    #[error("value for {field} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("value for {field} is not one of the allowed options")]
    InvalidOption { field: String },
}

/// One choice in a select selector
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// How a field is rendered and what values it accepts
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selector {
    /// Free-form text
    Text,
    /// Masked text
    Password,
    /// Checkbox
    Boolean,
    /// Integer constrained to an inclusive range
    Number {
        min: i64,
        max: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    /// One value out of a fixed option list
    Select { options: Vec<SelectOption> },
}

/// A single form field
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(flatten)]
    pub selector: Selector,
}

/// An ordered set of form fields
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormSchema {
    fields: IndexMap<String, FormField>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field
    pub fn required(mut self, name: impl Into<String>, selector: Selector) -> Self {
        self.fields.insert(
            name.into(),
            FormField {
                required: true,
                default: None,
                selector,
            },
        );
        self
    }

    /// Add a required field with a default applied when the key is absent
    pub fn required_with_default(
        mut self,
        name: impl Into<String>,
        selector: Selector,
        default: Value,
    ) -> Self {
        self.fields.insert(
            name.into(),
            FormField {
                required: true,
                default: Some(default),
                selector,
            },
        );
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &IndexMap<String, FormField> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate submitted input against this schema.
    ///
    /// Returns the normalized value map with defaults filled in for
    /// absent fields.
    pub fn validate(&self, input: &HashMap<String, Value>) -> Result<HashMap<String, Value>, SchemaError> {
        for key in input.keys() {
            if !self.fields.contains_key(key) {
                return Err(SchemaError::UnknownField(key.clone()));
            }
        }

        let mut normalized = HashMap::new();

        for (name, field) in &self.fields {
            let value = match (input.get(name), &field.default) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    if field.required {
                        return Err(SchemaError::MissingField(name.clone()));
                    }
                    continue;
                }
            };

            Self::check_value(name, &field.selector, &value)?;
            normalized.insert(name.clone(), value);
        }

        Ok(normalized)
    }

    fn check_value(name: &str, selector: &Selector, value: &Value) -> Result<(), SchemaError> {
        match selector {
            Selector::Text | Selector::Password => {
                if !value.is_string() {
                    return Err(SchemaError::InvalidType {
                        field: name.to_string(),
                        expected: "string",
                    });
                }
            }
            Selector::Boolean => {
                if !value.is_boolean() {
                    return Err(SchemaError::InvalidType {
                        field: name.to_string(),
                        expected: "boolean",
                    });
                }
            }
            Selector::Number { min, max, .. } => {
                let number = value.as_i64().ok_or_else(|| SchemaError::InvalidType {
                    field: name.to_string(),
                    expected: "integer",
                })?;
                if number < *min || number > *max {
                    return Err(SchemaError::OutOfRange {
                        field: name.to_string(),
                        value: number,
                        min: *min,
                        max: *max,
                    });
                }
            }
            Selector::Select { options } => {
                let chosen = value.as_str().ok_or_else(|| SchemaError::InvalidType {
                    field: name.to_string(),
                    expected: "string",
                })?;
                if !options.iter().any(|o| o.value == chosen) {
                    return Err(SchemaError::InvalidOption {
                        field: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
