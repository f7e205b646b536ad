//! Declarative request validation.
//!
//! Each resource declares a static table of per-field rules; the generic
//! [`validate`] walk applies them to an incoming JSON body and collects
//! every failing check, not just the first. Handler logic never runs when
//! the collected list is non-empty.

use chrono::{Datelike, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ApiError, FieldError};

/// A single check applied to a present field value.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// String length within `min..=max` characters.
    Length { min: usize, max: usize },
    /// String length at most `max` characters.
    MaxLength(usize),
    /// String of only ASCII digits, with one of the given lengths.
    Digits(&'static [usize]),
    /// String equal to one of the listed values.
    OneOf(&'static [&'static str]),
    /// Integer within `min..=max`.
    IntRange { min: i64, max: i64 },
    /// Integer between `min` and the current calendar year.
    YearRange { min: i64 },
    /// Boolean value.
    Boolean,
    /// Non-empty string, no further format checks.
    NonEmpty,
}

/// Rules for one body field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: &'static str,
    pub required: bool,
    pub rules: &'static [Rule],
}

pub type Schema = &'static [FieldSpec];

/// Whether missing required fields are an error (create) or simply
/// left unchanged (partial update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Apply a schema to a request body, collecting all failing checks.
/// Fields not named by the schema are ignored, never rejected.
pub fn validate(schema: Schema, body: &Value, mode: Mode) -> Vec<FieldError> {
    let map = match body.as_object() {
        Some(map) => map,
        None => {
            return vec![FieldError::new("body", "Request body must be a JSON object")];
        }
    };

    let mut errors = Vec::new();
    for spec in schema {
        match map.get(spec.field) {
            None | Some(Value::Null) => {
                if spec.required && mode == Mode::Create {
                    errors.push(FieldError::new(
                        spec.field,
                        format!("{} is required", spec.field),
                    ));
                }
            }
            // Present but empty optional fields skip all checks.
            Some(Value::String(s)) if s.is_empty() && !spec.required => {}
            Some(value) => {
                for rule in spec.rules {
                    if let Some(message) = check(rule, value) {
                        errors.push(FieldError::new(spec.field, message));
                    }
                }
            }
        }
    }
    errors
}

/// Run one rule against a present value. Returns the failure message, if any.
fn check(rule: &Rule, value: &Value) -> Option<String> {
    match rule {
        Rule::Length { min, max } => match value.as_str() {
            Some(s) => {
                let len = s.chars().count();
                (len < *min || len > *max)
                    .then(|| format!("must be between {} and {} characters", min, max))
            }
            None => Some("must be a string".into()),
        },
        Rule::MaxLength(max) => match value.as_str() {
            Some(s) => {
                (s.chars().count() > *max).then(|| format!("must be at most {} characters", max))
            }
            None => Some("must be a string".into()),
        },
        Rule::Digits(lengths) => match value.as_str() {
            Some(s) => {
                let ok = s.chars().all(|c| c.is_ascii_digit()) && lengths.contains(&s.len());
                (!ok).then(|| {
                    let wanted: Vec<String> = lengths.iter().map(|l| l.to_string()).collect();
                    format!("must be {} digits", wanted.join(" or "))
                })
            }
            None => Some("must be a string".into()),
        },
        Rule::OneOf(allowed) => match value.as_str() {
            Some(s) => {
                (!allowed.contains(&s)).then(|| format!("must be one of: {}", allowed.join(", ")))
            }
            None => Some("must be a string".into()),
        },
        Rule::IntRange { min, max } => match value.as_i64() {
            Some(n) => {
                (n < *min || n > *max).then(|| format!("must be between {} and {}", min, max))
            }
            None => Some("must be an integer".into()),
        },
        Rule::YearRange { min } => {
            let max = i64::from(Utc::now().year());
            match value.as_i64() {
                Some(n) => {
                    (n < *min || n > max).then(|| format!("must be between {} and {}", min, max))
                }
                None => Some("must be an integer".into()),
            }
        }
        Rule::Boolean => value.as_bool().is_none().then(|| "must be a boolean".into()),
        Rule::NonEmpty => match value.as_str() {
            Some(s) => s.is_empty().then(|| "must not be empty".into()),
            None => Some("must be a string".into()),
        },
    }
}

/// Parse a path-parameter identifier. Malformed ids fail before any
/// store call is attempted.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_identifier(raw))
}
