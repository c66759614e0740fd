//! Evaluation context: where a value sits inside the structure being validated.
//!
//! Every time a spec descends into a field or an element it allocates a fresh
//! [`Context`] pointing at its parent. The resulting chain mirrors the call
//! depth of a single evaluation, not the shape of the data, and is never
//! mutated after construction. Failures keep a reference to their leaf
//! context so the runner can later derive a [`Path`] and a label.

use std::sync::Arc;

use serde_json::Value;

use crate::path::{Path, PathSegment};

/// Upper bound on the number of parent links followed when deriving a path.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 1024;

/// Label used for failures that have no context or no key/alias at all.
pub const ROOT_LABEL: &str = "value";

/// One step of nesting at evaluation time.
///
/// `current` is the container `key` indexes into (the parent object or
/// array), not the child value itself. A context synthesized by
/// [`designate`](crate::spec::designate) for a root-level spec carries only an
/// alias.
#[derive(Debug, Clone)]
pub struct Context<'v> {
    key: Option<PathSegment>,
    alias: Option<String>,
    current: Option<&'v Value>,
    parent: Option<Arc<Context<'v>>>,
}

impl<'v> Context<'v> {
    /// Creates the context for `key` inside `current`.
    pub fn new(
        key: impl Into<PathSegment>,
        current: &'v Value,
        parent: Option<Arc<Context<'v>>>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            alias: None,
            current: Some(current),
            parent,
        }
    }

    /// Returns a copy of `base` (or an empty root context) relabelled with `alias`.
    pub fn designated(base: Option<&Context<'v>>, alias: impl Into<String>) -> Self {
        match base {
            Some(ctx) => Self {
                alias: Some(alias.into()),
                ..ctx.clone()
            },
            None => Self {
                key: None,
                alias: Some(alias.into()),
                current: None,
                parent: None,
            },
        }
    }

    /// The key or index this node corresponds to within its container.
    pub fn key(&self) -> Option<&PathSegment> {
        self.key.as_ref()
    }

    /// The explicit display alias, if one was set with `designate`.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The container value that `key` indexes into.
    pub fn current(&self) -> Option<&'v Value> {
        self.current
    }

    /// The enclosing context, or None at the top of the chain.
    pub fn parent(&self) -> Option<&Arc<Context<'v>>> {
        self.parent.as_ref()
    }

    /// Human label for messages: the alias, else the key, else `"value"`.
    pub fn label(&self) -> String {
        match (&self.alias, &self.key) {
            (Some(alias), _) => alias.clone(),
            (None, Some(key)) => key.to_string(),
            (None, None) => ROOT_LABEL.to_string(),
        }
    }

    /// Iterates this context and its ancestors, leaf first.
    pub fn ancestors(&self) -> Ancestors<'_, 'v> {
        Ancestors { next: Some(self) }
    }

    /// Derives the root-to-leaf path of this context.
    pub fn path(&self) -> Path {
        self.path_bounded(DEFAULT_MAX_PATH_DEPTH)
    }

    /// Derives the path following at most `max_depth` links.
    ///
    /// Chains are built parent-first out of immutable `Arc`s, so they always
    /// terminate; the bound only guards against pathological depth. When it is
    /// hit the path is truncated to the leaf-most `max_depth` nodes.
    pub fn path_bounded(&self, max_depth: usize) -> Path {
        let mut segments: Vec<PathSegment> = Vec::new();
        let mut walked = 0;

        for ctx in self.ancestors() {
            if walked == max_depth {
                tracing::warn!(max_depth, "context chain exceeds maximum path depth, truncating");
                break;
            }
            walked += 1;
            if let Some(key) = &ctx.key {
                segments.push(key.clone());
            }
        }

        segments.reverse();
        Path::from_segments(segments)
    }
}

/// Leaf-to-root iterator over a context chain.
pub struct Ancestors<'a, 'v> {
    next: Option<&'a Context<'v>>,
}

impl<'a, 'v> Iterator for Ancestors<'a, 'v> {
    type Item = &'a Context<'v>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

/// Returns the label for an optional context.
pub(crate) fn label_of(context: Option<&Context<'_>>) -> String {
    context.map_or_else(|| ROOT_LABEL.to_string(), Context::label)
}
