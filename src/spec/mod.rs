//! Spec combinators.
//!
//! A [`Spec`] is an immutable tree of rules built once from validators and
//! other specs, then evaluated any number of times against values:
//!
//! - [`flow`] runs validators against one value, in order
//! - [`of`] (or [`shape`] and [`collection`]) descends into fields or elements
//! - [`compose`] joins several specs about the same value
//! - [`lazy`] and [`recursive`] defer a reference to a spec
//! - [`designate`] relabels the value for messages
//!
//! Building performs no validation. Every combinator honours
//! [`EvalOptions::until_fail`] and never reports an empty failure list.
//!
//! # Example
//!
//! ```rust
//! use specimen::spec::{self, EvalOptions};
//! use specimen::validators::{any, number, string};
//! use serde_json::json;
//!
//! let user = spec::shape([
//!     ("name", spec::flow([any::required(), string::is_string()])),
//!     ("age", spec::flow([number::is_number(), number::ge(18)])),
//! ]);
//!
//! let input = json!({"age": 12});
//! let failures = user.evaluate(&input, &EvalOptions::exhaustive()).unwrap();
//! assert_eq!(failures.keys(), vec!["any.required", "number.ge"]);
//! ```

mod lazy;
mod of;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::error::{Collector, Failures, RawFailure, SpecError};
use crate::validator::{Params, Validator};

pub use lazy::LazyRef;
use lazy::LazyId;
pub use of::{Of, Shape};

/// Invocation-time options threaded through every combinator.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions<'v> {
    /// Where the value being evaluated sits; None at the root.
    pub context: Option<Arc<Context<'v>>>,
    /// Stop at the first failure within the current branch.
    pub until_fail: bool,
    /// Lazy references already resolved below the point where data ran out.
    pub(crate) absent_trail: Vec<LazyId>,
}

impl<'v> EvalOptions<'v> {
    /// Options for evaluating at `context`, or at the root when None.
    pub fn new(context: Option<Arc<Context<'v>>>, until_fail: bool) -> Self {
        Self {
            context,
            until_fail,
            absent_trail: Vec::new(),
        }
    }

    /// Root options that collect every failure.
    pub fn exhaustive() -> Self {
        Self::new(None, false)
    }

    /// Root options that stop at the first failure.
    pub fn first_failure() -> Self {
        Self::new(None, true)
    }
}

/// A composed, immutable unit of validation logic.
///
/// Cloning is cheap: specs share their tree.
#[derive(Clone)]
pub struct Spec(Arc<SpecNode>);

#[derive(Debug)]
pub(crate) enum SpecNode {
    Flow(Vec<Validator>),
    Of(Of),
    Compose(Vec<Spec>),
    Designate { alias: String, inner: Spec },
    Recursive(Spec),
}

/// Which combinator built a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    Flow,
    Shape,
    Collection,
    Compose,
    Designate,
    Recursive,
}

impl Spec {
    fn new(node: SpecNode) -> Self {
        Self(Arc::new(node))
    }

    pub(crate) fn from_node(node: Arc<SpecNode>) -> Self {
        Self(node)
    }

    /// Evaluates the spec against `value`.
    ///
    /// Returns None when the value satisfies every rule, otherwise the
    /// failures in evaluation order.
    pub fn evaluate<'v>(
        &self,
        value: &'v Value,
        options: &EvalOptions<'v>,
    ) -> Option<Failures<'v>> {
        match &*self.0 {
            SpecNode::Flow(validators) => evaluate_flow(validators, value, options),
            SpecNode::Of(descriptor) => descriptor.evaluate(value, options),
            SpecNode::Compose(parts) => {
                let mut collector = Collector::new(options.until_fail);
                for part in parts {
                    collector.absorb(part.evaluate(value, options));
                    if collector.should_stop() {
                        break;
                    }
                }
                collector.finish()
            }
            SpecNode::Designate { alias, inner } => {
                let context = Context::designated(options.context.as_deref(), alias.as_str());
                let options = EvalOptions {
                    context: Some(Arc::new(context)),
                    ..options.clone()
                };
                inner.evaluate(value, &options)
            }
            SpecNode::Recursive(inner) => inner.evaluate(value, options),
        }
    }

    /// The combinator at the top of this spec.
    pub fn kind(&self) -> SpecKind {
        match &*self.0 {
            SpecNode::Flow(_) => SpecKind::Flow,
            SpecNode::Of(Of::Shape(_)) => SpecKind::Shape,
            SpecNode::Of(Of::Collection(_)) => SpecKind::Collection,
            SpecNode::Compose(_) => SpecKind::Compose,
            SpecNode::Designate { .. } => SpecKind::Designate,
            SpecNode::Recursive(_) => SpecKind::Recursive,
        }
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Spec").field(&self.0).finish()
    }
}

fn evaluate_flow<'v>(
    validators: &[Validator],
    value: &'v Value,
    options: &EvalOptions<'v>,
) -> Option<Failures<'v>> {
    let params = Params::new(options.context.as_deref());
    let mut collector = Collector::new(options.until_fail);

    for validator in validators {
        if let Some(outcome) = validator.check(value, &params) {
            let failure = RawFailure::new(outcome, value, options.context.clone());
            collector.absorb(Some(Failures::single(failure)));
        }
        if collector.should_stop() {
            break;
        }
    }

    collector.finish()
}

/// A child of `of` or `compose`: a built spec or a deferred reference to one.
#[derive(Debug, Clone)]
pub enum SpecRef {
    Spec(Spec),
    Lazy(LazyRef),
}

impl SpecRef {
    /// The referenced spec, resolving a lazy reference.
    pub fn resolve(&self) -> Option<Spec> {
        match self {
            SpecRef::Spec(spec) => Some(spec.clone()),
            SpecRef::Lazy(lazy) => lazy.resolve(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            SpecRef::Spec(_) => "spec",
            SpecRef::Lazy(_) => "lazy reference",
        }
    }
}

impl From<Spec> for SpecRef {
    fn from(spec: Spec) -> Self {
        SpecRef::Spec(spec)
    }
}

impl From<LazyRef> for SpecRef {
    fn from(lazy: LazyRef) -> Self {
        SpecRef::Lazy(lazy)
    }
}

/// Runs `validators` in order against the same value and context.
pub fn flow<I>(validators: I) -> Spec
where
    I: IntoIterator<Item = Validator>,
{
    Spec::new(SpecNode::Flow(validators.into_iter().collect()))
}

/// Descends into the fields or elements named by `descriptor`.
pub fn of(descriptor: impl Into<Of>) -> Spec {
    Spec::new(SpecNode::Of(descriptor.into()))
}

/// Shorthand for `of(Of::shape(fields))`.
pub fn shape<I, K, S>(fields: I) -> Spec
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<SpecRef>,
{
    of(Of::shape(fields))
}

/// Shorthand for `of(Of::collection(element))`.
pub fn collection(element: impl Into<SpecRef>) -> Spec {
    of(Of::collection(element))
}

/// Joins several specs about the same value.
///
/// Every part must be a built spec. Lazy references are only resolved by
/// `of` and are rejected here.
///
/// # Example
///
/// ```rust
/// use specimen::{spec, SpecError};
/// use specimen::validators::any;
///
/// let required = spec::flow([any::required()]);
/// assert!(spec::compose([required.clone()]).is_ok());
///
/// let err = spec::compose([spec::SpecRef::from(required), spec::lazy(|| spec::flow([])).into()])
///     .unwrap_err();
/// assert_eq!(err, SpecError::NotASpec { position: 1, kind: "lazy reference" });
/// ```
pub fn compose<I, S>(parts: I) -> Result<Spec, SpecError>
where
    I: IntoIterator<Item = S>,
    S: Into<SpecRef>,
{
    let specs = parts
        .into_iter()
        .enumerate()
        .map(|(position, part)| match part.into() {
            SpecRef::Spec(spec) => Ok(spec),
            other => Err(SpecError::NotASpec {
                position,
                kind: other.kind_name(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Spec::new(SpecNode::Compose(specs)))
}

/// Wraps a factory for later resolution. The factory is not called here.
pub fn lazy<F>(factory: F) -> LazyRef
where
    F: Fn() -> Spec + Send + Sync + 'static,
{
    LazyRef::factory(factory)
}

/// Evaluates `spec` with its label overridden to `alias`.
///
/// The structural key, and therefore the path, is unchanged.
pub fn designate(alias: impl Into<String>, spec: Spec) -> Spec {
    Spec::new(SpecNode::Designate {
        alias: alias.into(),
        inner: spec,
    })
}

/// Curried [`designate`].
pub fn designator(alias: impl Into<String>) -> impl Fn(Spec) -> Spec {
    let alias = alias.into();
    move |spec| designate(alias.clone(), spec)
}

/// Builds a spec that refers to itself.
///
/// `build` receives a reference to the spec being built and can place it
/// anywhere a [`SpecRef`] is accepted. The reference is weak, so the spec is
/// freed normally once dropped; it must not be resolved inside `build`.
///
/// # Dangling references
///
/// The reference is only meant to live inside the spec `build` returns. A
/// clone kept elsewhere and evaluated after that spec is dropped cannot
/// resolve: `of` reports it as a
/// [`spec.missing.reference`](crate::keys::spec::MISSING_REFERENCE) failure
/// and logs a warning, so such a value never passes.
///
/// # Example
///
/// ```rust
/// use specimen::spec;
/// use specimen::validators::{any, array};
/// use serde_json::json;
///
/// let user = spec::recursive(|user| {
///     spec::shape([
///         ("name", spec::SpecRef::from(spec::flow([any::required()]))),
///         (
///             "friends",
///             spec::compose([spec::flow([array::is_array()]), spec::collection(user)])
///                 .expect("all parts are specs")
///                 .into(),
///         ),
///     ])
/// });
///
/// let input = json!({"name": "a", "friends": [{"name": "b", "friends": [{}]}]});
/// let errors = specimen::validate_all(&user, &input).unwrap();
/// assert_eq!(errors.first().path().to_string(), "friends[0].friends[0].name");
/// ```
pub fn recursive<F>(build: F) -> Spec
where
    F: FnOnce(LazyRef) -> Spec,
{
    Spec(Arc::new_cyclic(|node| {
        SpecNode::Recursive(build(LazyRef::cyclic(node.clone())))
    }))
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Spec>();
    assert_sync::<Spec>();
    assert_send::<SpecRef>();
    assert_sync::<SpecRef>();
};
