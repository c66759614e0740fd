//! Boolean and truthiness rules.
//!
//! Truthiness follows the usual dynamic-language convention: `false`, `0`,
//! `""` and null are falsy, everything else (including empty arrays and
//! objects) is truthy.

use serde_json::Value;

use crate::error::Outcome;
use crate::keys::boolean::{FALSY, TRUTHY, TYPE};
use crate::validator::{to_validator, Validator};

fn is_truthy_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fails on anything that is not a JSON boolean.
pub fn is_boolean() -> Validator {
    to_validator(TYPE, |value, _| value.is_boolean())
}

/// Fails on falsy values, null included.
///
/// Unlike the other validators this one sees nulls: a checkbox that must be
/// ticked is not satisfied by its absence.
pub fn is_truthy() -> Validator {
    Validator::new(|value, _| (!is_truthy_value(value)).then(|| Outcome::new(TRUTHY)))
}

/// Fails on truthy values.
pub fn is_falsy() -> Validator {
    to_validator(FALSY, |value, _| !is_truthy_value(value))
}
