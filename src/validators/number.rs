//! Numeric rules.

use std::cmp::Ordering;

use serde_json::Value;

use crate::keys::number::{GE, GT, LE, LT, RANGE, TYPE};
use crate::validator::{to_validator, to_validator_with_args, Validator};

/// A numeric threshold.
///
/// Integer limits are compared exactly against integer values, so bounds
/// above 2^53 keep their precision. Any other pairing is compared as `f64`.
/// The configured value is reported back in failure arguments as given, so
/// `ge(18)` reports `18`, not `18.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    value: f64,
    reported: Value,
}

impl Limit {
    /// The threshold as a float.
    pub fn get(&self) -> f64 {
        self.value
    }
}

macro_rules! limit_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Limit {
            fn from(n: $t) -> Self {
                Limit { value: n as f64, reported: Value::from(n) }
            }
        })*
    };
}

limit_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<f64> for Limit {
    fn from(n: f64) -> Self {
        Limit {
            value: n,
            reported: Value::from(n),
        }
    }
}

impl From<f32> for Limit {
    fn from(n: f32) -> Self {
        Limit::from(f64::from(n))
    }
}

impl From<Limit> for Value {
    fn from(limit: Limit) -> Self {
        limit.reported
    }
}

fn as_integer(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

/// True for non-numbers, otherwise whether `value` orders against `limit` as `accept` wants.
fn compare(value: &Value, limit: &Limit, accept: fn(Ordering) -> bool) -> bool {
    let Some(float) = value.as_f64() else {
        return true;
    };
    let ordering = match (as_integer(value), as_integer(&limit.reported)) {
        (Some(n), Some(bound)) => Some(n.cmp(&bound)),
        _ => float.partial_cmp(&limit.value),
    };
    ordering.is_some_and(accept)
}

/// Fails on anything that is not a JSON number.
pub fn is_number() -> Validator {
    to_validator(TYPE, |value, _| value.is_number())
}

/// Value strictly greater than `min`.
pub fn gt(min: impl Into<Limit>) -> Validator {
    to_validator_with_args(GT, |min: &Limit, value, _| compare(value, min, Ordering::is_gt))(min.into())
}

/// Value strictly lower than `max`.
pub fn lt(max: impl Into<Limit>) -> Validator {
    to_validator_with_args(LT, |max: &Limit, value, _| compare(value, max, Ordering::is_lt))(max.into())
}

/// Value greater than or equal to `min`.
pub fn ge(min: impl Into<Limit>) -> Validator {
    to_validator_with_args(GE, |min: &Limit, value, _| compare(value, min, Ordering::is_ge))(min.into())
}

/// Value lower than or equal to `max`.
pub fn le(max: impl Into<Limit>) -> Validator {
    to_validator_with_args(LE, |max: &Limit, value, _| compare(value, max, Ordering::is_le))(max.into())
}

/// `min <= value < max`. Reports `[min, max]`.
///
/// # Example
///
/// ```rust
/// use specimen::{validators::number, Params};
/// use serde_json::json;
///
/// let percent = number::in_range(0, 100);
/// assert!(percent.check(&json!(0), &Params::default()).is_none());
/// assert!(percent.check(&json!(100), &Params::default()).is_some());
/// ```
pub fn in_range(min: impl Into<Limit>, max: impl Into<Limit>) -> Validator {
    to_validator_with_args(RANGE, |bounds: &Vec<Limit>, value, _| {
        compare(value, &bounds[0], Ordering::is_ge) && compare(value, &bounds[1], Ordering::is_lt)
    })(vec![min.into(), max.into()])
}
