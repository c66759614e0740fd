//! Array rules. Lengths are element counts.

use serde_json::Value;

use crate::keys::array::{EVERY, IN_RANGE, LENGTH, MAX_LENGTH, MIN_LENGTH, SOME, TYPE};
use crate::validator::{to_validator, to_validator_with_args, Validator};

fn items(value: &Value, holds: impl Fn(&[Value]) -> bool) -> bool {
    value.as_array().map_or(true, |items| holds(items))
}

/// Fails on anything that is not a JSON array.
pub fn is_array() -> Validator {
    to_validator(TYPE, |value, _| value.is_array())
}

/// At least `min` items.
pub fn min_length(min: usize) -> Validator {
    to_validator_with_args(MIN_LENGTH, |min: &usize, value, _| {
        items(value, |items| items.len() >= *min)
    })(min)
}

/// At most `max` items.
pub fn max_length(max: usize) -> Validator {
    to_validator_with_args(MAX_LENGTH, |max: &usize, value, _| {
        items(value, |items| items.len() <= *max)
    })(max)
}

/// Exactly `len` elements.
pub fn length(len: usize) -> Validator {
    to_validator_with_args(LENGTH, |len: &usize, value, _| {
        items(value, |items| items.len() == *len)
    })(len)
}

/// `min <= len <= max`. Reports `[min, max]`.
pub fn in_range(min: usize, max: usize) -> Validator {
    to_validator_with_args(IN_RANGE, |bounds: &Vec<usize>, value, _| {
        items(value, |items| bounds[0] <= items.len() && items.len() <= bounds[1])
    })(vec![min, max])
}

/// Every element satisfies `predicate`. Reports no arguments.
///
/// # Example
///
/// ```rust
/// use specimen::{validators::array, Params};
/// use serde_json::json;
///
/// let positives = array::every(|item| item.as_f64().map_or(false, |n| n > 0.0));
/// assert!(positives.check(&json!([1, 2]), &Params::default()).is_none());
/// assert!(positives.check(&json!([1, -2]), &Params::default()).is_some());
/// ```
pub fn every<P>(predicate: P) -> Validator
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    to_validator(EVERY, move |value, _| items(value, |items| items.iter().all(&predicate)))
}

/// At least one element satisfies `predicate`; an empty array fails.
pub fn some<P>(predicate: P) -> Validator
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    to_validator(SOME, move |value, _| items(value, |items| items.iter().any(&predicate)))
}
