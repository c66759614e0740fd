//! The validator contract and helpers to build validators from predicates.
//!
//! A validator is a pure rule check. It receives the value and the
//! [`Params`] of the position it is evaluated at, and returns `None` when it
//! has nothing to report or an [`Outcome`] naming the rule that failed.
//!
//! Validators built with [`to_validator`] and [`to_validator_with_args`]
//! ignore null values: absence is the business of `any::required`, which lets
//! required-ness be composed independently of type and range rules.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::error::Outcome;

/// What a validator knows about where it is being evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Params<'a> {
    /// The context of the value; None at the root.
    pub context: Option<&'a Context<'a>>,
}

impl<'a> Params<'a> {
    /// Params for the given context.
    pub fn new(context: Option<&'a Context<'a>>) -> Self {
        Self { context }
    }

    /// The container the value was read from, if any.
    ///
    /// Cross-field rules use this to look at sibling fields.
    pub fn container(&self) -> Option<&'a Value> {
        self.context.and_then(Context::current)
    }

    /// Reads a sibling field of the value being validated.
    pub fn sibling(&self, key: &str) -> Option<&'a Value> {
        self.container().and_then(|container| container.get(key))
    }
}

type RuleFn = dyn Fn(&Value, &Params<'_>) -> Option<Outcome> + Send + Sync;

/// A cloneable, thread-safe rule check.
///
/// # Example
///
/// ```rust
/// use specimen::{Outcome, Params, Validator};
/// use serde_json::json;
///
/// let even = Validator::new(|value, _| match value.as_i64() {
///     Some(n) if n % 2 != 0 => Some(Outcome::new("number.even")),
///     _ => None,
/// });
///
/// assert!(even.check(&json!(4), &Params::default()).is_none());
/// assert_eq!(even.check(&json!(3), &Params::default()).unwrap().key, "number.even");
/// ```
#[derive(Clone)]
pub struct Validator(Arc<RuleFn>);

impl Validator {
    /// Wraps a raw rule. The rule sees null values too.
    pub fn new<F>(rule: F) -> Self
    where
        F: Fn(&Value, &Params<'_>) -> Option<Outcome> + Send + Sync + 'static,
    {
        Self(Arc::new(rule))
    }

    /// Runs the rule.
    pub fn check(&self, value: &Value, params: &Params<'_>) -> Option<Outcome> {
        (self.0)(value, params)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

/// Builds a validator from a boolean predicate.
///
/// Null values are skipped; any other value for which the predicate returns
/// false fails with `key`.
///
/// # Example
///
/// ```rust
/// use specimen::{to_validator, Params};
/// use serde_json::json;
///
/// let truthy = to_validator("custom.truthy", |value, _| value.as_bool() == Some(true));
///
/// assert!(truthy.check(&json!(true), &Params::default()).is_none());
/// assert!(truthy.check(&json!(null), &Params::default()).is_none());
/// assert!(truthy.check(&json!(false), &Params::default()).is_some());
/// ```
pub fn to_validator<P>(key: impl Into<String>, predicate: P) -> Validator
where
    P: Fn(&Value, &Params<'_>) -> bool + Send + Sync + 'static,
{
    let key = key.into();
    Validator::new(move |value, params| {
        if value.is_null() || predicate(value, params) {
            None
        } else {
            Some(Outcome::new(key.as_str()))
        }
    })
}

/// Builds a validator factory from a predicate over configuration arguments.
///
/// The returned closure takes the arguments and yields a validator. Failures
/// carry the arguments (converted to a [`Value`]) for message templates.
///
/// # Example
///
/// ```rust
/// use specimen::{to_validator_with_args, Params};
/// use serde_json::json;
///
/// let multiple_of = to_validator_with_args("number.multiple", |n: &i64, value, _| {
///     value.as_i64().map_or(true, |v| v % n == 0)
/// });
///
/// let by_five = multiple_of(5);
/// assert!(by_five.check(&json!(10), &Params::default()).is_none());
///
/// let outcome = by_five.check(&json!(12), &Params::default()).unwrap();
/// assert_eq!(outcome.key, "number.multiple");
/// assert_eq!(outcome.args, Some(json!(5)));
/// ```
pub fn to_validator_with_args<A, P>(
    key: impl Into<String>,
    predicate: P,
) -> impl Fn(A) -> Validator
where
    A: Clone + Into<Value> + Send + Sync + 'static,
    P: Fn(&A, &Value, &Params<'_>) -> bool + Send + Sync + 'static,
{
    let key: Arc<str> = Arc::from(key.into());
    let predicate = Arc::new(predicate);

    move |args: A| {
        let key = Arc::clone(&key);
        let predicate = Arc::clone(&predicate);
        let reported: Value = args.clone().into();

        Validator::new(move |value, params| {
            if value.is_null() || predicate(&args, value, params) {
                None
            } else {
                Some(Outcome::with_args(&*key, reported.clone()))
            }
        })
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Validator>();
    assert_sync::<Validator>();
};
