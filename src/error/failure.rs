//! Raw failures produced while a spec tree is evaluated.
//!
//! Failures are plain data: [`Outcome`] is what a single validator reports,
//! [`RawFailure`] pins it to the value and [`Context`] it was observed at, and
//! [`Failures`] is the non-empty list a spec returns instead of a bare `Vec`.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;
use stillwater::prelude::*;

use crate::context::Context;

/// The failure tuple a validator returns: an error key plus optional arguments.
///
/// # Example
///
/// ```rust
/// use specimen::Outcome;
/// use serde_json::json;
///
/// let outcome = Outcome::with_args("number.ge", 18);
/// assert_eq!(outcome.key, "number.ge");
/// assert_eq!(outcome.args, Some(json!(18)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Stable, namespaced identifier of the rule that failed (e.g. `string.email`).
    pub key: String,
    /// Parameterization the message template needs, if any.
    pub args: Option<Value>,
}

impl Outcome {
    /// An outcome without arguments.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            args: None,
        }
    }

    /// An outcome carrying the rule's arguments.
    pub fn with_args(key: impl Into<String>, args: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            args: Some(args.into()),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.args {
            Some(args) => write!(f, "{} {}", self.key, args),
            None => f.write_str(&self.key),
        }
    }
}

/// One failed validator invocation, before any message formatting.
#[derive(Debug, Clone)]
pub struct RawFailure<'v> {
    /// What the validator reported.
    pub outcome: Outcome,
    /// The value the validator was given.
    pub value: &'v Value,
    /// Where the value sits; None for the root value.
    pub context: Option<Arc<Context<'v>>>,
}

impl<'v> RawFailure<'v> {
    /// Creates a raw failure.
    pub fn new(outcome: Outcome, value: &'v Value, context: Option<Arc<Context<'v>>>) -> Self {
        Self {
            outcome,
            value,
            context,
        }
    }

    /// The error key of the failed rule.
    pub fn key(&self) -> &str {
        &self.outcome.key
    }

    /// The leaf context, if any.
    pub fn context(&self) -> Option<&Context<'v>> {
        self.context.as_deref()
    }
}

/// A non-empty list of raw failures.
///
/// Spec evaluation returns `Option<Failures>`: `None` is the single "no
/// failures" sentinel and an empty list cannot be represented.
#[derive(Debug, Clone)]
pub struct Failures<'v>(NonEmptyVec<RawFailure<'v>>);

impl<'v> Failures<'v> {
    /// A list holding one failure.
    pub fn single(failure: RawFailure<'v>) -> Self {
        Self(NonEmptyVec::singleton(failure))
    }

    /// Normalizes a vec: empty becomes None.
    pub fn from_vec(failures: Vec<RawFailure<'v>>) -> Option<Self> {
        NonEmptyVec::from_vec(failures).map(Self)
    }

    /// Number of failures, always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The first failure recorded.
    pub fn first(&self) -> &RawFailure<'v> {
        self.0.head()
    }

    /// Iterates failures in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &RawFailure<'v>> {
        self.0.iter()
    }

    /// Error keys in order, mostly useful in tests and logs.
    pub fn keys(&self) -> Vec<&str> {
        self.0.iter().map(RawFailure::key).collect()
    }

    /// Converts into a plain vec.
    pub fn into_vec(self) -> Vec<RawFailure<'v>> {
        self.0.into_vec()
    }
}

impl Semigroup for Failures<'_> {
    fn combine(self, other: Self) -> Self {
        Failures(self.0.combine(other.0))
    }
}

impl<'v> IntoIterator for Failures<'v> {
    type Item = RawFailure<'v>;
    type IntoIter = std::vec::IntoIter<RawFailure<'v>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

/// Accumulates child results for the combinators.
///
/// Shared by `flow`, `of` and `compose` so that all of them flatten,
/// short-circuit and normalize the same way.
pub(crate) struct Collector<'v> {
    failures: Option<Failures<'v>>,
    until_fail: bool,
}

impl<'v> Collector<'v> {
    pub(crate) fn new(until_fail: bool) -> Self {
        Self {
            failures: None,
            until_fail,
        }
    }

    /// Appends a child result, preserving order.
    pub(crate) fn absorb(&mut self, result: Option<Failures<'v>>) {
        if let Some(incoming) = result {
            self.failures = Some(match self.failures.take() {
                Some(existing) => existing.combine(incoming),
                None => incoming,
            });
        }
    }

    /// True once evaluation of the current branch should stop.
    pub(crate) fn should_stop(&self) -> bool {
        self.until_fail && self.failures.is_some()
    }

    pub(crate) fn finish(self) -> Option<Failures<'v>> {
        self.failures
    }
}

// Raw failures cross thread boundaries in batch validation.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Failures<'static>>();
    assert_sync::<Failures<'static>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failure<'v>(key: &str, value: &'v Value) -> RawFailure<'v> {
        RawFailure::new(Outcome::new(key), value, None)
    }

    #[test]
    fn test_from_vec_normalizes_empty() {
        assert!(Failures::from_vec(Vec::new()).is_none());
        let value = json!(1);
        let failures = Failures::from_vec(vec![failure("a", &value)]).unwrap();
        assert_eq!(failures.len(), 1);
        assert!(!failures.is_empty());

        let many = Failures::from_vec(vec![
            failure("a", &value),
            failure("b", &value),
            failure("c", &value),
        ])
        .unwrap();
        assert_eq!(many.keys(), vec!["a", "b", "c"]);
        assert_eq!(many.first().key(), "a");
    }

    #[test]
    fn test_combine_preserves_order() {
        let value = json!(null);
        let combined = Failures::single(failure("first", &value))
            .combine(Failures::single(failure("second", &value)));
        assert_eq!(combined.keys(), vec!["first", "second"]);
        assert_eq!(combined.first().key(), "first");
    }

    #[test]
    fn test_collector_stops_only_when_until_fail() {
        let value = json!(null);

        let mut exhaustive = Collector::new(false);
        exhaustive.absorb(Some(Failures::single(failure("a", &value))));
        assert!(!exhaustive.should_stop());

        let mut first = Collector::new(true);
        assert!(!first.should_stop());
        first.absorb(None);
        assert!(!first.should_stop());
        first.absorb(Some(Failures::single(failure("a", &value))));
        assert!(first.should_stop());
        assert_eq!(first.finish().unwrap().len(), 1);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::new("any.required").to_string(), "any.required");
        assert_eq!(
            Outcome::with_args("number.range", json!([1, 5])).to_string(),
            "number.range [1,5]"
        );
    }
}
