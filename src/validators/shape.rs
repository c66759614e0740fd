//! Rules about objects and their key sets.
//!
//! The key rules report the configured keys as arguments and have no opinion
//! about non-objects.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::keys::shape::{ALLOWED_KEYS, EXPECTED_KEYS, FORBIDDEN_KEYS, TYPE};
use crate::validator::{to_validator, to_validator_with_args, Validator};

fn object(value: &Value, holds: impl Fn(&Map<String, Value>) -> bool) -> bool {
    value.as_object().map_or(true, holds)
}

fn key_list<I, K>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    keys.into_iter().map(Into::into).collect()
}

/// Fails on anything that is not a JSON object. Arrays are not shapes.
pub fn is_shape() -> Validator {
    to_validator(TYPE, |value, _| value.is_object())
}

/// Every key present must be one of `keys`.
pub fn allowed_keys<I, K>(keys: I) -> Validator
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    to_validator_with_args(ALLOWED_KEYS, |allowed: &Vec<String>, value, _| {
        object(value, |obj| obj.keys().all(|key| allowed.contains(key)))
    })(key_list(keys))
}

/// None of `keys` may be present.
pub fn forbidden_keys<I, K>(keys: I) -> Validator
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    to_validator_with_args(FORBIDDEN_KEYS, |forbidden: &Vec<String>, value, _| {
        object(value, |obj| !forbidden.iter().any(|key| obj.contains_key(key)))
    })(key_list(keys))
}

/// The object's keys must be exactly `keys`.
///
/// # Example
///
/// ```rust
/// use specimen::{validators::shape, Params};
/// use serde_json::json;
///
/// let point = shape::expect_keys(["x", "y"]);
/// assert!(point.check(&json!({"y": 1, "x": 2}), &Params::default()).is_none());
/// assert!(point.check(&json!({"x": 2}), &Params::default()).is_some());
/// assert!(point.check(&json!({"x": 2, "y": 1, "z": 0}), &Params::default()).is_some());
/// ```
pub fn expect_keys<I, K>(keys: I) -> Validator
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    to_validator_with_args(EXPECTED_KEYS, |expected: &Vec<String>, value, _| {
        object(value, |obj| {
            let present: HashSet<&str> = obj.keys().map(String::as_str).collect();
            expected.len() == present.len() && expected.iter().all(|key| present.contains(key.as_str()))
        })
    })(key_list(keys))
}
