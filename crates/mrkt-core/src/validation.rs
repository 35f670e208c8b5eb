//! Request validation
//!
//! Payloads declare their rules with `#[derive(Validate)]`. A failed check is
//! flattened into a [`ValidationErrorMap`] keyed by rule name, with an English
//! message per failing field. All failures are collected in one pass.

use std::collections::BTreeMap;

use serde_json::Value;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

/// Failed rule name to human-readable message
pub type ValidationErrorMap = BTreeMap<String, String>;

/// Run the payload's declared rules without touching the payload
pub fn validate_request<T: Validate>(payload: &T) -> Result<(), ValidationErrorMap> {
    payload.validate().map_err(|errors| translate_errors(&errors))
}

/// Rule `required`: the string must not be empty
pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Rules `required` then `email`; an empty value fails `required` only
pub fn required_email(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if !value.validate_email() {
        return Err(ValidationError::new("email"));
    }
    Ok(())
}

/// Rules `required` then `min` (in characters); an empty value fails `required` only
pub fn required_min_length(value: &str, min: u64) -> Result<(), ValidationError> {
    required(value)?;
    if (value.chars().count() as u64) < min {
        let mut err = ValidationError::new("min");
        err.add_param("min".into(), &min);
        return Err(err);
    }
    Ok(())
}

/// Flatten validator output into a rule-keyed message map
///
/// When several fields break the same rule their messages share the key,
/// joined with `", "` in field order.
pub fn translate_errors(errors: &ValidationErrors) -> ValidationErrorMap {
    let fields: BTreeMap<String, &Vec<ValidationError>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (display_name(&field.to_string()), errs))
        .collect();

    let mut map = ValidationErrorMap::new();
    for (field, errs) in fields {
        for err in errs {
            let message = translate(&field, err);
            map.entry(err.code.to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&message);
                })
                .or_insert(message);
        }
    }
    map
}

/// Render one rule failure for a field
fn translate(field: &str, err: &ValidationError) -> String {
    match err.code.as_ref() {
        "required" => format!("{} is a required field", field),
        "email" => format!("{} must be a valid email", field),
        "min" => format!(
            "{} must be at least {} characters in length",
            field,
            param(err, "min")
        ),
        "range" => format!(
            "{} must be between {} and {}",
            field,
            param(err, "min"),
            param(err, "max")
        ),
        "oneof" => format!("{} must be one of [{}]", field, param(err, "allowed")),
        _ => err
            .message
            .as_ref()
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| format!("{} is invalid", field)),
    }
}

fn param(err: &ValidationError, key: &str) -> String {
    match err.params.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|v| v.to_string())
            .or_else(|| n.as_f64().map(|v| v.to_string()))
            .unwrap_or_else(|| n.to_string()),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Wire name of a field: `first_name` becomes `FirstName`
fn display_name(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
