//! Rules that apply to values of any type.

use serde_json::Value;

use crate::error::Outcome;
use crate::keys::any::{ALLOW, REQUIRED};
use crate::validator::{to_validator_with_args, Validator};

/// Fails on null (which is also how absent fields are presented).
pub fn required() -> Validator {
    Validator::new(|value, _| value.is_null().then(|| Outcome::new(REQUIRED)))
}

/// Passes values equal to one of `values`.
///
/// # Example
///
/// ```rust
/// use specimen::{validators::any, Params};
/// use serde_json::json;
///
/// let color = any::allow(["red", "green"]);
/// assert!(color.check(&json!("red"), &Params::default()).is_none());
///
/// let outcome = color.check(&json!("blue"), &Params::default()).unwrap();
/// assert_eq!(outcome.args, Some(json!(["red", "green"])));
/// ```
pub fn allow<I, V>(values: I) -> Validator
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let allowed: Vec<Value> = values.into_iter().map(Into::into).collect();
    to_validator_with_args(ALLOW, |allowed: &Vec<Value>, value, _| allowed.contains(value))(allowed)
}
