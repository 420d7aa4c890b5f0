//! Declarative form validation shared by the sign-up, contract info and
//! change-email forms.
//!
//! Every failure is reported as a translation key (e.g. `invalid_email`), one
//! per field, so any rendering layer can localize it.

pub mod contract_info;
pub mod modal;
pub mod signup;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// Field-level validation failure carrying a translation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Field name to translation key, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` for `field` unless the field already failed.
    pub fn insert(&mut self, field: impl Into<String>, key: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| key.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, key)| (field.as_str(), key.as_str()))
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, key) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{field}: {key}")?;
            first = false;
        }
        Ok(())
    }
}

type ValidatorCallback = dyn Fn(&str) -> Result<(), String> + Send + Sync;
type SharedValidatorCallback = Arc<ValidatorCallback>;

/// Built-in validation rules. Each carries the key reported on failure.
#[derive(Clone)]
pub enum Validator {
    MinChars(usize, &'static str),
    MaxChars(usize, &'static str),
    Matches(Regex, &'static str),
    PositiveNumber(&'static str),
    Custom(SharedValidatorCallback),
}

impl Validator {
    pub fn custom<F>(func: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        Validator::Custom(Arc::new(func))
    }

    fn validate(&self, input: &str) -> Result<(), ValidationError> {
        match self {
            Validator::MinChars(min, key) => {
                if input.chars().count() < *min {
                    Err(ValidationError::new(*key))
                } else {
                    Ok(())
                }
            }
            Validator::MaxChars(max, key) => {
                if input.chars().count() > *max {
                    Err(ValidationError::new(*key))
                } else {
                    Ok(())
                }
            }
            Validator::Matches(pattern, key) => {
                if pattern.is_match(input) {
                    Ok(())
                } else {
                    Err(ValidationError::new(*key))
                }
            }
            Validator::PositiveNumber(key) => match input.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
                _ => Err(ValidationError::new(*key)),
            },
            Validator::Custom(func) => func(input).map_err(ValidationError::new),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::MinChars(min, key) => write!(f, "MinChars({min}, {key})"),
            Validator::MaxChars(max, key) => write!(f, "MaxChars({max}, {key})"),
            Validator::Matches(pattern, key) => write!(f, "Matches({}, {key})", pattern.as_str()),
            Validator::PositiveNumber(key) => write!(f, "PositiveNumber({key})"),
            Validator::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    /// Reported when the trimmed value is empty; `None` makes the field optional.
    pub required: Option<&'static str>,
    pub validators: Vec<Validator>,
}

impl FieldDescriptor {
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: None,
            validators: Vec::new(),
        }
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub fn rule(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// First failing rule for `value`; empty values only trip `required`.
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return match self.required {
                Some(message) => Err(ValidationError::new(message)),
                None => Ok(()),
            };
        }
        self.validators
            .iter()
            .try_for_each(|validator| validator.validate(value))
    }
}

/// Metadata describing a whole form, including field order.
#[derive(Debug, Clone)]
pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Runs every field rule; missing entries are treated as empty strings.
    pub fn validate(&self, values: &BTreeMap<String, String>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            let value = values.get(field.key).map(String::as_str).unwrap_or("");
            if let Err(err) = field.check(value) {
                errors.insert(field.key, err.message);
            }
        }
        errors
    }
}

/// A form whose values can be checked field by field and then committed.
pub trait FormFlow {
    type Output;

    /// Descriptor controlling field order and per-field rules.
    fn descriptor(&self) -> &FormDescriptor;

    /// Cross-field checks that run after the per-field rules.
    fn cross_check(&self, _values: &BTreeMap<String, String>, _errors: &mut FieldErrors) {}

    /// Builds the typed output from values that passed validation.
    fn commit(&self, values: BTreeMap<String, String>) -> Self::Output;

    fn validate(&self, values: &BTreeMap<String, String>) -> Result<(), FieldErrors> {
        let mut errors = self.descriptor().validate(values);
        self.cross_check(values, &mut errors);
        errors.into_result()
    }

    fn run(&self, values: BTreeMap<String, String>) -> Result<Self::Output, FieldErrors> {
        self.validate(&values)?;
        Ok(self.commit(values))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// User-facing text: a translation key, or a verbatim server message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Key(String),
    Text(String),
}

impl Message {
    pub fn key(key: impl Into<String>) -> Self {
        Message::Key(key.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Message::Key(value) | Message::Text(value) => value,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: Message,
}

impl Toast {
    pub fn success(key: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: Message::key(key),
        }
    }

    pub fn error(key: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: Message::key(key),
        }
    }

    pub fn error_text(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: Message::Text(text.into()),
        }
    }
}

/// Collects `(field, value)` pairs into the map the descriptors consume.
pub(crate) fn value_map<'a>(
    pairs: impl IntoIterator<Item = (&'static str, &'a str)>,
) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .collect()
}
