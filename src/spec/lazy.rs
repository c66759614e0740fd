//! Deferred references to specs.
//!
//! A [`LazyRef`] lets a spec mention another spec (or itself) before that
//! spec exists. It is resolved by `of` each time the referenced spec is
//! needed, and never memoized: resolving is just calling a closure that hands
//! back an already built spec.

use std::any::TypeId;
use std::fmt;
use std::sync::{Arc, Weak};

use super::{Spec, SpecNode};

#[derive(Clone)]
enum Resolver {
    Factory {
        id: TypeId,
        factory: Arc<dyn Fn() -> Spec + Send + Sync>,
    },
    Cyclic(Weak<SpecNode>),
}

/// Identity of a lazy reference while descending into absent data.
///
/// Factories are identified by their closure type, so a spec function that
/// rebuilds `lazy(itself)` on every call keeps one identity. Recursive
/// references are identified by the node they point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LazyId {
    Factory(TypeId),
    Cyclic(usize),
}

/// A deferred pointer to a [`Spec`].
///
/// Built with [`lazy`](super::lazy) from a factory, or handed to the builder
/// closure of [`recursive`](super::recursive) as a reference to the spec
/// being built.
#[derive(Clone)]
pub struct LazyRef(Resolver);

impl LazyRef {
    pub(crate) fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Spec + Send + Sync + 'static,
    {
        Self(Resolver::Factory {
            id: TypeId::of::<F>(),
            factory: Arc::new(factory),
        })
    }

    pub(crate) fn cyclic(node: Weak<SpecNode>) -> Self {
        Self(Resolver::Cyclic(node))
    }

    pub(crate) fn id(&self) -> LazyId {
        match &self.0 {
            Resolver::Factory { id, .. } => LazyId::Factory(*id),
            Resolver::Cyclic(node) => LazyId::Cyclic(node.as_ptr() as usize),
        }
    }

    /// Produces the referenced spec.
    ///
    /// Returns None only for a reference handed out by `recursive` whose spec
    /// has since been dropped. `of` reports that as a
    /// [`spec.missing.reference`](crate::keys::spec::MISSING_REFERENCE) failure.
    pub fn resolve(&self) -> Option<Spec> {
        match &self.0 {
            Resolver::Factory { factory, .. } => Some(factory()),
            Resolver::Cyclic(node) => {
                let spec = node.upgrade().map(Spec::from_node);
                if spec.is_none() {
                    tracing::warn!("recursive spec reference outlived its spec");
                }
                spec
            }
        }
    }
}

impl fmt::Debug for LazyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Resolver::Factory { .. } => f.write_str("LazyRef(factory)"),
            Resolver::Cyclic(_) => f.write_str("LazyRef(recursive)"),
        }
    }
}
