//! Running specs and formatting their failures.
//!
//! A [`Runner`] pairs an evaluation mode with a message table. It evaluates a
//! spec, and if anything failed, renders every raw failure into a
//! [`FormattedError`] with a message, a label and a lazily derived path.
//!
//! The crate-level [`validate`] family uses two shared runners over the
//! default messages: first-failure ([`validate`]) and exhaustive
//! ([`validate_all`]).

use std::sync::{Arc, OnceLock};

use rayon::prelude::*;
use serde_json::Value;
use stillwater::Validation;

use crate::context::{label_of, DEFAULT_MAX_PATH_DEPTH};
use crate::error::{Failures, FormattedError, LazyPath, RawFailure, ValidationErrors};
use crate::messages::{render, MessageParams, MessageTable};
use crate::spec::{EvalOptions, Spec};
use crate::ValidationResult;

/// How a [`Runner`] evaluates and formats.
///
/// # Example
///
/// ```rust
/// use specimen::{create_validate_function, keys, MessageTable, RunnerConfig};
///
/// let messages = MessageTable::defaults()
///     .merge(&MessageTable::new().with(keys::any::REQUIRED, |p| format!("{} fehlt", p.label)));
///
/// let runner = create_validate_function(RunnerConfig::new().until_fail(false).messages(messages));
/// assert!(!runner.config().is_until_fail());
/// ```
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    until_fail: bool,
    messages: Arc<MessageTable>,
    max_path_depth: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            until_fail: false,
            messages: MessageTable::defaults(),
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        }
    }
}

impl RunnerConfig {
    /// Exhaustive evaluation with the default messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// First-failure evaluation with the default messages.
    pub fn first_failure() -> Self {
        Self::new().until_fail(true)
    }

    /// Exhaustive evaluation with the default messages.
    pub fn exhaustive() -> Self {
        Self::new().until_fail(false)
    }

    /// Chooses between first-failure (`true`) and exhaustive (`false`) evaluation.
    pub fn until_fail(mut self, until_fail: bool) -> Self {
        self.until_fail = until_fail;
        self
    }

    /// Replaces the message table. Keys missing from it fall back to its
    /// `any.unknown` entry, then to a generic message.
    pub fn messages(mut self, messages: impl Into<Arc<MessageTable>>) -> Self {
        self.messages = messages.into();
        self
    }

    /// Caps how many context links are followed when deriving a path.
    pub fn max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }

    /// Whether evaluation stops at the first failure.
    pub fn is_until_fail(&self) -> bool {
        self.until_fail
    }

    /// The table messages are rendered from.
    pub fn message_table(&self) -> &MessageTable {
        &self.messages
    }

    /// How many context links a path derivation follows before truncating.
    pub fn path_depth_limit(&self) -> usize {
        self.max_path_depth
    }
}

/// Per-call options for the `*_with_opts` entry points.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Messages consulted before the runner's table.
    pub custom_messages: Option<MessageTable>,
}

impl ValidateOptions {
    /// Options overriding messages for this call only.
    pub fn with_messages(messages: MessageTable) -> Self {
        Self {
            custom_messages: Some(messages),
        }
    }
}

/// An immutable, shareable validate function.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    /// A runner bound to `config`.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// The configuration this runner was built with.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Validates `value`; None when it is valid.
    pub fn validate<'v>(&self, spec: &Spec, value: &'v Value) -> Option<ValidationErrors<'v>> {
        self.validate_with_opts(spec, &ValidateOptions::default(), value)
    }

    /// Validates `value`, resolving messages through `options.custom_messages` first.
    pub fn validate_with_opts<'v>(
        &self,
        spec: &Spec,
        options: &ValidateOptions,
        value: &'v Value,
    ) -> Option<ValidationErrors<'v>> {
        let failures = spec.evaluate(value, &EvalOptions::new(None, self.config.until_fail))?;
        let errors = self.format(failures, options.custom_messages.as_ref());

        if let Some(errors) = &errors {
            tracing::trace!(
                errors = errors.len(),
                until_fail = self.config.until_fail,
                "validation finished with errors"
            );
        }
        errors
    }

    /// [`validate`](Self::validate) in the shape of a `stillwater::Validation`.
    pub fn check<'v>(&self, spec: &Spec, value: &'v Value) -> ValidationResult<'v> {
        match self.validate(spec, value) {
            None => Validation::Success(()),
            Some(errors) => Validation::Failure(errors),
        }
    }

    /// True if `value` satisfies `spec`.
    ///
    /// Always stops at the first failure and never formats messages.
    pub fn is_valid(&self, spec: &Spec, value: &Value) -> bool {
        spec.evaluate(value, &EvalOptions::first_failure()).is_none()
    }

    /// Negation of [`is_valid`](Self::is_valid).
    pub fn is_invalid(&self, spec: &Spec, value: &Value) -> bool {
        !self.is_valid(spec, value)
    }

    /// Validates each value in parallel. Results keep the input order.
    pub fn validate_batch<'v>(
        &self,
        spec: &Spec,
        values: &'v [Value],
    ) -> Vec<Option<ValidationErrors<'v>>> {
        values.par_iter().map(|value| self.validate(spec, value)).collect()
    }

    fn format<'v>(
        &self,
        failures: Failures<'v>,
        custom: Option<&MessageTable>,
    ) -> Option<ValidationErrors<'v>> {
        ValidationErrors::collect_from(failures.into_iter().map(|failure| {
            let RawFailure {
                outcome,
                value,
                context,
            } = failure;

            let label = label_of(context.as_deref());
            let path = LazyPath::new(context, self.config.max_path_depth);
            let message = {
                let params = MessageParams::new(&label, value, outcome.args.as_ref(), &path);
                render(&outcome.key, &params, custom, &self.config.messages)
            };

            FormattedError::new(message, outcome.key, value, outcome.args, path)
        }))
    }
}

/// Builds a runner; `validate` and `validate_with_opts` are its two entry points.
pub fn create_validate_function(config: RunnerConfig) -> Runner {
    Runner::new(config)
}

fn first_failure_runner() -> &'static Runner {
    static RUNNER: OnceLock<Runner> = OnceLock::new();
    RUNNER.get_or_init(|| Runner::new(RunnerConfig::first_failure()))
}

fn exhaustive_runner() -> &'static Runner {
    static RUNNER: OnceLock<Runner> = OnceLock::new();
    RUNNER.get_or_init(|| Runner::new(RunnerConfig::exhaustive()))
}

/// Validates with the default messages, stopping at the first failure.
///
/// # Example
///
/// ```rust
/// use specimen::{spec, validate, validators::{any, string}};
/// use serde_json::json;
///
/// let name = spec::flow([any::required(), string::is_string(), string::min_length(2)]);
///
/// assert!(validate(&name, &json!("Ada")).is_none());
///
/// let value = json!(7);
/// let errors = validate(&name, &value).unwrap();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.first().message, "value should be a string");
/// ```
pub fn validate<'v>(spec: &Spec, value: &'v Value) -> Option<ValidationErrors<'v>> {
    first_failure_runner().validate(spec, value)
}

/// Validates with the default messages, collecting every failure.
pub fn validate_all<'v>(spec: &Spec, value: &'v Value) -> Option<ValidationErrors<'v>> {
    exhaustive_runner().validate(spec, value)
}

/// [`validate`] with per-call message overrides.
pub fn validate_with_opts<'v>(
    spec: &Spec,
    options: &ValidateOptions,
    value: &'v Value,
) -> Option<ValidationErrors<'v>> {
    first_failure_runner().validate_with_opts(spec, options, value)
}

/// [`validate_all`] with per-call message overrides.
pub fn validate_all_with_opts<'v>(
    spec: &Spec,
    options: &ValidateOptions,
    value: &'v Value,
) -> Option<ValidationErrors<'v>> {
    exhaustive_runner().validate_with_opts(spec, options, value)
}

/// True if `value` satisfies `spec`. No messages are formatted.
pub fn is_valid(spec: &Spec, value: &Value) -> bool {
    first_failure_runner().is_valid(spec, value)
}

/// True if `value` fails `spec`. No messages are formatted.
pub fn is_invalid(spec: &Spec, value: &Value) -> bool {
    first_failure_runner().is_invalid(spec, value)
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Runner>();
    assert_sync::<Runner>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use crate::spec::{designate, flow, shape};
    use crate::validators::{any, number, string};
    use serde_json::json;

    fn signup() -> Spec {
        shape([
            ("name", flow([any::required(), string::is_string()])),
            ("age", flow([number::is_number(), number::ge(18)])),
        ])
    }

    #[test]
    fn test_first_failure_and_exhaustive_differ_only_in_count() {
        let input = json!({"age": 3});

        let first = validate(&signup(), &input).unwrap();
        assert_eq!(first.messages(), vec!["name is required"]);

        let all = validate_all(&signup(), &input).unwrap();
        assert_eq!(
            all.messages(),
            vec!["name is required", "age should be greater or equal than 18"]
        );
    }

    #[test]
    fn test_valid_input_is_none() {
        let input = json!({"name": "Ada", "age": 36});
        assert!(validate_all(&signup(), &input).is_none());
        assert!(is_valid(&signup(), &input));
        assert!(!is_invalid(&signup(), &input));
    }

    #[test]
    fn test_custom_messages_take_precedence() {
        let options = ValidateOptions::with_messages(
            MessageTable::new().with(keys::any::REQUIRED, |p| format!("please fill in {}", p.label)),
        );
        let input = json!({"age": 30});

        let errors = validate_all_with_opts(&signup(), &options, &input).unwrap();
        assert_eq!(errors.messages(), vec!["please fill in name"]);

        let errors = validate_with_opts(&signup(), &ValidateOptions::default(), &input).unwrap();
        assert_eq!(errors.messages(), vec!["name is required"]);
    }

    #[test]
    fn test_root_failures_are_labelled_value() {
        let errors = validate(&flow([any::required()]), &Value::Null).unwrap();
        let error = errors.first();
        assert_eq!(error.message, "value is required");
        assert!(error.path().is_root());
        assert!(error.context().is_none());
    }

    #[test]
    fn test_alias_is_used_as_label() {
        let spec = shape([("addr", designate("Mailing Address", flow([any::required()])))]);
        let value = json!({});
        let errors = validate(&spec, &value).unwrap();
        assert_eq!(errors.first().message, "Mailing Address is required");
        assert_eq!(errors.first().path().to_string(), "addr");
    }

    #[test]
    fn test_is_valid_never_formats() {
        let exploding = MessageTable::new().with(keys::any::REQUIRED, |_| -> String {
            panic!("messages must not be rendered")
        });
        let runner = create_validate_function(RunnerConfig::new().messages(exploding));

        assert!(runner.is_invalid(&signup(), &json!({})));
        assert!(runner.is_valid(&signup(), &json!({"name": "x"})));
    }

    #[test]
    fn test_unregistered_key_uses_fallback() {
        let odd = flow([crate::to_validator("custom.odd", |v, _| {
            v.as_i64().map_or(true, |n| n % 2 == 1)
        })]);

        let value = json!(2);
        let errors = validate(&odd, &value).unwrap();
        assert_eq!(errors.first().message, "value contains errors");
        assert_eq!(errors.first().key, "custom.odd");
    }

    #[test]
    fn test_path_depth_limit_truncates() {
        let spec = shape([("a", shape([("b", shape([("c", flow([any::required()]))]))]))]);
        let input = json!({"a": {"b": {}}});
        let runner = create_validate_function(RunnerConfig::new().max_path_depth(2));

        let errors = runner.validate(&spec, &input).unwrap();
        assert_eq!(errors.first().path().to_string(), "b.c");
        assert_eq!(validate(&spec, &input).unwrap().first().path().to_string(), "a.b.c");
    }

    #[test]
    fn test_check_returns_validation() {
        let runner = Runner::default();
        assert!(runner.check(&signup(), &json!({"name": "x"})).is_success());
        assert!(runner.check(&signup(), &json!({})).is_failure());
    }

    #[test]
    fn test_batch_keeps_order() {
        let runner = Runner::new(RunnerConfig::exhaustive());
        let inputs = vec![json!({"name": "a"}), json!({}), json!({"name": "b", "age": 1})];

        let results = runner.validate_batch(&signup(), &inputs);
        assert!(results[0].is_none());
        assert_eq!(results[1].as_ref().unwrap().first().key, keys::any::REQUIRED);
        assert_eq!(results[2].as_ref().unwrap().first().key, keys::number::GE);
    }
}
