//! Formatted, externally visible validation errors.

use std::fmt::{self, Display};
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use stillwater::prelude::*;

use crate::context::Context;
use crate::path::Path;

/// A path that is derived from a context chain the first time it is read.
#[derive(Debug, Clone)]
pub struct LazyPath<'v> {
    context: Option<Arc<Context<'v>>>,
    max_depth: usize,
    cell: OnceLock<Path>,
}

impl<'v> LazyPath<'v> {
    pub(crate) fn new(context: Option<Arc<Context<'v>>>, max_depth: usize) -> Self {
        Self {
            context,
            max_depth,
            cell: OnceLock::new(),
        }
    }

    /// Returns the path, computing it on first access.
    pub fn get(&self) -> &Path {
        self.cell.get_or_init(|| match &self.context {
            Some(ctx) => ctx.path_bounded(self.max_depth),
            None => Path::root(),
        })
    }

    /// True once the path has been computed.
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    pub(crate) fn context(&self) -> Option<&Context<'v>> {
        self.context.as_deref()
    }
}

/// One validation failure, ready to show to a user.
///
/// # Example
///
/// ```rust
/// use specimen::{spec, validate_all, validators::number};
/// use serde_json::json;
///
/// let adult = spec::shape([("age", spec::flow([number::is_number(), number::ge(18)]))]);
/// let input = json!({"age": 17});
///
/// let errors = validate_all(&adult, &input).unwrap();
/// let error = errors.first();
/// assert_eq!(error.message, "age should be greater or equal than 18");
/// assert_eq!(error.path().to_string(), "age");
/// assert_eq!(error.args, Some(json!(18)));
/// ```
#[derive(Debug, Clone)]
pub struct FormattedError<'v> {
    /// The rendered message.
    pub message: String,
    /// The error key of the failed rule.
    pub key: String,
    /// The value that failed.
    pub value: &'v Value,
    /// The rule's arguments, if any.
    pub args: Option<Value>,
    path: LazyPath<'v>,
}

impl<'v> FormattedError<'v> {
    pub(crate) fn new(
        message: String,
        key: String,
        value: &'v Value,
        args: Option<Value>,
        path: LazyPath<'v>,
    ) -> Self {
        Self {
            message,
            key,
            value,
            args,
            path,
        }
    }

    /// Root-to-leaf location of the failing value. Computed once, on first call.
    pub fn path(&self) -> &Path {
        self.path.get()
    }

    /// The context the failure was recorded at, if it was below the root.
    pub fn context(&self) -> Option<&Context<'v>> {
        self.path.context()
    }
}

impl Display for FormattedError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path();
        if path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", path, self.message)
        }
    }
}

impl std::error::Error for FormattedError<'_> {}

/// The non-empty list of errors returned by a failed validation.
#[derive(Debug, Clone)]
pub struct ValidationErrors<'v>(NonEmptyVec<FormattedError<'v>>);

impl<'v> ValidationErrors<'v> {
    /// A list with one error.
    pub fn single(error: FormattedError<'v>) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Collects errors; None if the iterator is empty.
    pub fn collect_from<I>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = FormattedError<'v>>,
    {
        NonEmptyVec::from_vec(errors.into_iter().collect()).map(Self)
    }

    /// Number of errors, always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The first error.
    pub fn first(&self) -> &FormattedError<'v> {
        self.0.head()
    }

    /// Iterates errors in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &FormattedError<'v>> {
        self.0.iter()
    }

    /// Errors located at `path`.
    pub fn at_path(&self, path: &Path) -> Vec<&FormattedError<'v>> {
        self.0.iter().filter(|e| e.path() == path).collect()
    }

    /// Errors produced by the rule `key`.
    pub fn with_key(&self, key: &str) -> Vec<&FormattedError<'v>> {
        self.0.iter().filter(|e| e.key == key).collect()
    }

    /// Messages in order.
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    /// Converts into a plain vec.
    pub fn into_vec(self) -> Vec<FormattedError<'v>> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationErrors<'_> {
    fn combine(self, other: Self) -> Self {
        ValidationErrors(self.0.combine(other.0))
    }
}

impl Display for ValidationErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors<'_> {}

impl<'v> IntoIterator for ValidationErrors<'v> {
    type Item = FormattedError<'v>;
    type IntoIter = std::vec::IntoIter<FormattedError<'v>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationErrors<'static>>();
    assert_sync::<ValidationErrors<'static>>();
};
