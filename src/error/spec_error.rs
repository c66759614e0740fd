//! Errors raised while a spec tree is being built.
//!
//! These are the only errors this crate returns as `Err`. Rule violations in
//! the validated data are reported as [`Failures`](super::Failures), never as
//! a `SpecError`.

/// A malformed combinator argument, detected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// `compose` was given something other than a built spec.
    #[error("compose args should be specs: argument {position} is a {kind}")]
    NotASpec {
        /// Zero-based position of the offending argument.
        position: usize,
        /// What was found instead (e.g. `lazy reference`).
        kind: &'static str,
    },

    /// A collection descriptor must hold exactly one element spec.
    #[error("collection descriptor expects exactly one element spec, got {found}")]
    CollectionArity {
        /// Number of element specs supplied.
        found: usize,
    },
}
