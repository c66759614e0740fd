//! Structural descent: shapes (objects) and collections (arrays).

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::context::Context;
use crate::error::{Collector, Failures, Outcome, RawFailure, SpecError};
use crate::keys;

use super::{EvalOptions, Spec, SpecRef};

/// Stand-in for absent fields.
static ABSENT: Value = Value::Null;

/// What `of` descends into, chosen once at construction time.
#[derive(Debug, Clone)]
pub enum Of {
    /// Named fields of an object, evaluated in declaration order.
    Shape(IndexMap<String, SpecRef>),
    /// Every element of an array, against one element spec.
    Collection(SpecRef),
}

impl Of {
    /// A shape descriptor from `(key, spec)` pairs.
    ///
    /// Declaration order is evaluation order. A repeated key keeps its first
    /// position and its last spec.
    pub fn shape<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<SpecRef>,
    {
        Of::Shape(
            fields
                .into_iter()
                .map(|(key, member)| (key.into(), member.into()))
                .collect(),
        )
    }

    /// A collection descriptor for arrays whose elements satisfy `element`.
    pub fn collection(element: impl Into<SpecRef>) -> Self {
        Of::Collection(element.into())
    }

    pub(crate) fn evaluate<'v>(
        &self,
        value: &'v Value,
        options: &EvalOptions<'v>,
    ) -> Option<Failures<'v>> {
        match self {
            Of::Shape(fields) => evaluate_shape(fields, value, options),
            Of::Collection(element) => evaluate_collection(element, value, options),
        }
    }
}

/// The list form of a collection descriptor: exactly one element spec.
impl TryFrom<Vec<SpecRef>> for Of {
    type Error = SpecError;

    fn try_from(mut members: Vec<SpecRef>) -> Result<Self, Self::Error> {
        match members.len() {
            1 => Ok(Of::Collection(members.remove(0))),
            found => Err(SpecError::CollectionArity { found }),
        }
    }
}

/// Builder for shape descriptors whose fields mix specs and lazy references.
///
/// # Example
///
/// ```rust
/// use specimen::spec::{self, Shape};
/// use specimen::validators::{any, string};
///
/// fn user() -> specimen::Spec {
///     Shape::new()
///         .field("name", spec::flow([string::is_string(), any::required()]))
///         .field("best_friend", spec::lazy(user))
///         .build()
/// }
///
/// let _spec = user();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: IndexMap<String, SpecRef>,
}

impl Shape {
    /// An empty shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field. Fields are evaluated in the order they are declared.
    pub fn field(mut self, key: impl Into<String>, member: impl Into<SpecRef>) -> Self {
        self.fields.insert(key.into(), member.into());
        self
    }

    /// The descriptor built so far.
    pub fn descriptor(self) -> Of {
        Of::Shape(self.fields)
    }

    /// Finishes into a spec.
    pub fn build(self) -> Spec {
        super::of(self.descriptor())
    }
}

fn evaluate_shape<'v>(
    fields: &IndexMap<String, SpecRef>,
    value: &'v Value,
    options: &EvalOptions<'v>,
) -> Option<Failures<'v>> {
    let mut collector = Collector::new(options.until_fail);

    for (key, member) in fields {
        let child = value.get(key.as_str()).unwrap_or(&ABSENT);
        let context = Context::new(key.as_str(), value, options.context.clone());
        let Some(child_options) = options.descend(member, child, context) else {
            continue;
        };
        collector.absorb(evaluate_member(member, child, &child_options));

        if collector.should_stop() {
            break;
        }
    }

    collector.finish()
}

fn evaluate_collection<'v>(
    element: &SpecRef,
    value: &'v Value,
    options: &EvalOptions<'v>,
) -> Option<Failures<'v>> {
    // Array-ness is asserted by a type validator composed alongside, not here.
    let items = value.as_array()?;
    let mut collector = Collector::new(options.until_fail);

    for (index, item) in items.iter().enumerate() {
        let context = Context::new(index, value, options.context.clone());
        let Some(item_options) = options.descend(element, item, context) else {
            continue;
        };
        collector.absorb(evaluate_member(element, item, &item_options));

        if collector.should_stop() {
            break;
        }
    }

    collector.finish()
}

fn evaluate_member<'v>(
    member: &SpecRef,
    value: &'v Value,
    options: &EvalOptions<'v>,
) -> Option<Failures<'v>> {
    match member.resolve() {
        Some(spec) => spec.evaluate(value, options),
        None => Some(Failures::single(RawFailure::new(
            Outcome::new(keys::spec::MISSING_REFERENCE),
            value,
            options.context.clone(),
        ))),
    }
}

impl<'v> EvalOptions<'v> {
    /// Options for evaluating `member` against `child` at `context`.
    ///
    /// None when `child` is absent and `member` is a lazy reference already
    /// resolved for absent data on this branch.
    fn descend(
        &self,
        member: &SpecRef,
        child: &Value,
        context: Context<'v>,
    ) -> Option<EvalOptions<'v>> {
        let mut absent_trail = Vec::new();
        if child.is_null() {
            absent_trail.clone_from(&self.absent_trail);
            if let SpecRef::Lazy(lazy) = member {
                let id = lazy.id();
                if absent_trail.contains(&id) {
                    return None;
                }
                absent_trail.push(id);
            }
        }

        Some(EvalOptions {
            context: Some(Arc::new(context)),
            until_fail: self.until_fail,
            absent_trail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{compose, flow, lazy, recursive, shape};
    use crate::validators::{any, number};
    use serde_json::json;

    fn required() -> Spec {
        flow([any::required()])
    }

    fn paths(failures: &Failures<'_>) -> Vec<String> {
        failures
            .iter()
            .map(|f| f.context().map(|c| c.path().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_shape_visits_keys_in_declaration_order() {
        let shape = Of::shape([("z", required()), ("a", required()), ("m", required())]);
        let value = json!({});

        let failures = shape.evaluate(&value, &EvalOptions::exhaustive()).unwrap();
        assert_eq!(paths(&failures), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_shape_short_circuits_until_fail() {
        let shape = Of::shape([("a", required()), ("b", required())]);
        let value = json!({});

        let failures = shape.evaluate(&value, &EvalOptions::first_failure()).unwrap();
        assert_eq!(paths(&failures), vec!["a"]);
    }

    #[test]
    fn test_shape_on_non_object_reads_absent_fields() {
        let shape = Of::shape([("a", required())]);
        let value = json!(42);

        let failures = shape.evaluate(&value, &EvalOptions::exhaustive()).unwrap();
        assert!(failures.first().value.is_null());
        assert_eq!(failures.first().context().unwrap().current(), Some(&json!(42)));
    }

    #[test]
    fn test_collection_ignores_non_arrays() {
        let items = Of::collection(required());
        for value in [json!(null), json!({"0": null}), json!("abc"), json!(3)] {
            assert!(items.evaluate(&value, &EvalOptions::exhaustive()).is_none());
        }
    }

    #[test]
    fn test_collection_tags_indices() {
        let items = Of::collection(flow([number::ge(0)]));
        let value = json!([1, -1, 2, -2]);

        let failures = items.evaluate(&value, &EvalOptions::exhaustive()).unwrap();
        assert_eq!(paths(&failures), vec!["[1]", "[3]"]);

        let ctx = failures.first().context().unwrap();
        assert!(std::ptr::eq(ctx.current().unwrap(), &value));
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let items = Of::collection(required());
        assert!(items.evaluate(&json!([]), &EvalOptions::exhaustive()).is_none());
    }

    #[test]
    fn test_list_descriptor_requires_one_element() {
        assert!(Of::try_from(vec![SpecRef::from(required())]).is_ok());
        assert_eq!(
            Of::try_from(Vec::<SpecRef>::new()).unwrap_err(),
            SpecError::CollectionArity { found: 0 }
        );
        assert_eq!(
            Of::try_from(vec![SpecRef::from(required()), SpecRef::from(lazy(required))]).unwrap_err(),
            SpecError::CollectionArity { found: 2 }
        );
    }

    #[test]
    fn test_builder_accepts_lazy_members() {
        let shape = Shape::new()
            .field("a", required())
            .field("b", lazy(required))
            .descriptor();
        let value = json!({"a": 1});

        let failures = shape.evaluate(&value, &EvalOptions::exhaustive()).unwrap();
        assert_eq!(paths(&failures), vec!["b"]);
    }

    fn address() -> Spec {
        compose([required(), shape([("city", required())])]).unwrap()
    }

    #[test]
    fn test_lazy_member_matches_eager_member_on_null() {
        let eager = Of::shape([("address", address())]);
        let deferred = Of::shape([("address", lazy(address))]);

        for value in [json!(null), json!({}), json!({"address": {}})] {
            let expected = eager.evaluate(&value, &EvalOptions::exhaustive()).map(|f| paths(&f));
            let actual = deferred.evaluate(&value, &EvalOptions::exhaustive()).map(|f| paths(&f));
            assert_eq!(actual, expected, "{value}");
        }
        let failures = deferred.evaluate(&json!(null), &EvalOptions::exhaustive()).unwrap();
        assert_eq!(paths(&failures), vec!["address", "address.city"]);
    }

    #[test]
    fn test_lazy_collection_element_on_null_item() {
        let items = Of::collection(lazy(required));
        let value = json!([1, null]);
        let failures = items.evaluate(&value, &EvalOptions::exhaustive()).unwrap();
        assert_eq!(paths(&failures), vec!["[1]"]);
    }

    #[test]
    fn test_dropped_recursive_reference_is_reported() {
        let mut escaped = None;
        let node = recursive(|me| {
            escaped = Some(me.clone());
            shape([("next", me)])
        });
        drop(node);

        let orphan = Of::shape([("next", escaped.unwrap())]);
        let value = json!({"next": {}});
        let failures = orphan.evaluate(&value, &EvalOptions::exhaustive()).unwrap();
        assert_eq!(failures.keys(), vec![keys::spec::MISSING_REFERENCE]);
        assert_eq!(paths(&failures), vec!["next"]);
    }
}
