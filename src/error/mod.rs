//! Error and failure types.
//!
//! Construction problems are [`SpecError`]s. Rule violations are data:
//! [`Failures`] while evaluating, [`ValidationErrors`] once formatted.

mod failure;
mod formatted;
mod spec_error;

pub(crate) use failure::Collector;
pub use failure::{Failures, Outcome, RawFailure};
pub use formatted::{FormattedError, LazyPath, ValidationErrors};
pub use spec_error::SpecError;
