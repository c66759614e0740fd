//! # Specimen
//!
//! Composable validation specs with path-aware, localizable failure messages.
//!
//! ## Overview
//!
//! A spec is built once from small rules and evaluated many times. Evaluation
//! either stops at the first failure or collects all of them, and every
//! failure remembers where it happened, so the runner can report a message,
//! the offending value, its arguments and its path inside the input.
//!
//! ## Core Types
//!
//! - [`Validator`]: a single rule check, built with [`to_validator`] or
//!   [`to_validator_with_args`], or taken from [`validators`]
//! - [`Spec`]: a tree of rules built with the combinators in [`spec`]
//! - [`Context`]: where a value sits while it is being evaluated
//! - [`MessageTable`]: error key to message template
//! - [`Runner`]: evaluates a spec and formats [`ValidationErrors`]
//!
//! ## Example
//!
//! ```rust
//! use specimen::{spec, validate_all, validators::{any, array, number, string}};
//! use serde_json::json;
//!
//! let hero = spec::shape([
//!     ("name", spec::flow([any::required(), string::is_string(), string::is_not_empty()])),
//!     ("level", spec::flow([number::is_number(), number::in_range(1, 100)])),
//!     (
//!         "abilities",
//!         spec::compose([
//!             spec::flow([array::is_array(), array::min_length(1)]),
//!             spec::collection(spec::flow([string::is_string()])),
//!         ])
//!         .unwrap(),
//!     ),
//! ]);
//!
//! let input = json!({"name": "", "level": 100, "abilities": ["fly", 3]});
//! let errors = validate_all(&hero, &input).unwrap();
//!
//! let report: Vec<String> = errors.iter().map(ToString::to_string).collect();
//! assert_eq!(report, vec![
//!     "name: name should not be blank",
//!     "level: level should be lower than 100 and greater or equal 1",
//!     "abilities[1]: 1 should be a string",
//! ]);
//! ```

pub mod context;
pub mod error;
pub mod keys;
pub mod messages;
pub mod path;
pub mod runner;
pub mod spec;
pub mod validator;
pub mod validators;

pub use context::Context;
pub use error::{
    Failures, FormattedError, LazyPath, Outcome, RawFailure, SpecError, ValidationErrors,
};
pub use messages::{MessageFn, MessageParams, MessageTable};
pub use path::{Path, PathSegment};
pub use runner::{
    create_validate_function, is_invalid, is_valid, validate, validate_all,
    validate_all_with_opts, validate_with_opts, Runner, RunnerConfig, ValidateOptions,
};
pub use spec::{EvalOptions, LazyRef, Spec, SpecKind, SpecRef};
pub use validator::{to_validator, to_validator_with_args, Params, Validator};

/// The result of [`Runner::check`] in `stillwater`'s applicative shape.
pub type ValidationResult<'v> = stillwater::Validation<(), ValidationErrors<'v>>;
