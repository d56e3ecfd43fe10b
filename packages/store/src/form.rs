//! Form schemas and the presence check run before any create or update.
//!
//! A screen's modal form is described by a list of [`FieldSpec`]s. The
//! operator's input comes back as [`FormValues`] (control name → raw string),
//! and [`validate`] reports every required field that is missing. Nothing
//! beyond presence is checked, except that a number field whose text does not
//! parse counts as missing, the same way a browser's numeric input yields an
//! empty value for garbage.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Lead;
use crate::resource::Resource;

/// One option of a select control.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    Password,
    /// Closed set of values; anything outside it counts as missing.
    Enum(Vec<SelectOption>),
    /// Select over loaded records. Any non-empty value is accepted, so an
    /// existing reference survives an edit even if its target is not loaded.
    Reference(Vec<SelectOption>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Inline message shown when a required value is missing.
    pub message: &'static str,
}

impl FieldSpec {
    pub fn required(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        message: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            message,
        }
    }

    pub fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            message: "",
        }
    }

    fn accepts(&self, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.is_empty() {
            return false;
        }
        match &self.kind {
            FieldKind::Number => raw.parse::<f64>().is_ok_and(f64::is_finite),
            FieldKind::Enum(options) => options.iter().any(|o| o.value == raw),
            FieldKind::Text | FieldKind::Password | FieldKind::Reference(_) => true,
        }
    }
}

/// Raw form input keyed by control name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Trimmed text for a control, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(str::trim).unwrap_or_default().to_string()
    }

    /// Trimmed text, or `None` when the control is absent or blank.
    pub fn non_blank(&self, name: &str) -> Option<String> {
        let text = self.text(name);
        (!text.is_empty()).then_some(text)
    }

    /// A finite number; `inf` and `NaN` read as absent.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
    }
}

/// Required-field violations, keyed by control name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.keys().copied().collect();
        write!(f, "missing required fields: {}", names.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Presence check over a schema.
pub fn validate(fields: &[FieldSpec], values: &FormValues) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for field in fields.iter().filter(|f| f.required) {
        let ok = values.get(field.name).is_some_and(|raw| field.accepts(raw));
        if !ok {
            errors.0.insert(field.name, field.message);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Data a schema may need from other collections (e.g. the lead dropdown).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormContext {
    pub leads: Vec<Lead>,
}

/// A resource that can be created and edited through a modal form.
pub trait Editable: Resource {
    /// Body sent on create and update.
    type Payload: Serialize + Clone + fmt::Debug + PartialEq + 'static;

    /// Whether the form needs the lead collection loaded.
    const NEEDS_LEADS: bool = false;

    fn fields(ctx: &FormContext, editing: bool) -> Vec<FieldSpec>;

    /// Pre-fill values for editing.
    fn to_values(&self) -> FormValues;

    fn create_payload(values: &FormValues, now: DateTime<Utc>) -> Self::Payload;

    fn update_payload(&self, values: &FormValues, now: DateTime<Utc>) -> Self::Payload;
}
