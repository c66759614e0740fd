//! Message tables: error key to message template.
//!
//! A [`MessageTable`] maps error keys to functions rendering a message from
//! [`MessageParams`]. Tables are immutable once built; overriding entries
//! produces a new table. The runner resolves a key through three tiers:
//! per-call custom messages, then the runner's table, then the table's
//! `any.unknown` entry (or a built-in generic message if even that is
//! missing). Resolution never fails.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::error::LazyPath;
use crate::keys;
use crate::path::Path;

/// Everything a message template can use.
pub struct MessageParams<'a> {
    /// The failing value's alias, key, or `"value"` at the root.
    pub label: &'a str,
    /// The value that failed.
    pub value: &'a Value,
    /// The rule's arguments, if any.
    pub args: Option<&'a Value>,
    path: &'a LazyPath<'a>,
}

impl<'a> MessageParams<'a> {
    pub(crate) fn new(
        label: &'a str,
        value: &'a Value,
        args: Option<&'a Value>,
        path: &'a LazyPath<'a>,
    ) -> Self {
        Self {
            label,
            value,
            args,
            path,
        }
    }

    /// The failure's path. Only computed if a template asks for it.
    pub fn path(&self) -> &Path {
        self.path.get()
    }

    /// The arguments rendered for humans: list items joined with `, `,
    /// strings unquoted, anything else as JSON.
    pub fn args_text(&self) -> String {
        self.args.map(display_value).unwrap_or_default()
    }

    /// The `i`-th element of array arguments, rendered for humans.
    pub fn arg(&self, i: usize) -> String {
        self.args
            .and_then(|args| args.get(i))
            .map(display_value)
            .unwrap_or_default()
    }
}

/// Renders a template.
pub type MessageFn = Arc<dyn Fn(&MessageParams<'_>) -> String + Send + Sync>;

/// An immutable mapping from error key to message template.
///
/// # Example
///
/// ```rust
/// use specimen::{keys, MessageTable};
///
/// let table = MessageTable::new()
///     .with(keys::any::REQUIRED, |p| format!("{} is mandatory", p.label));
///
/// let merged = MessageTable::defaults().merge(&table);
/// assert!(merged.contains(keys::any::REQUIRED));
/// assert!(merged.contains(keys::number::GE));
/// ```
#[derive(Clone, Default)]
pub struct MessageTable {
    entries: HashMap<String, MessageFn>,
}

impl MessageTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this table with `key` rendered by `template`.
    pub fn with<F>(mut self, key: impl Into<String>, template: F) -> Self
    where
        F: Fn(&MessageParams<'_>) -> String + Send + Sync + 'static,
    {
        self.entries.insert(key.into(), Arc::new(template));
        self
    }

    /// The shared table of default English messages, one per standard key.
    pub fn defaults() -> Arc<MessageTable> {
        static DEFAULTS: OnceLock<Arc<MessageTable>> = OnceLock::new();
        Arc::clone(DEFAULTS.get_or_init(|| Arc::new(default_table())))
    }

    /// Returns a new table: this one with `overrides` layered on top.
    pub fn merge(&self, overrides: &MessageTable) -> MessageTable {
        let mut entries = self.entries.clone();
        for (key, template) in &overrides.entries {
            entries.insert(key.clone(), Arc::clone(template));
        }
        MessageTable { entries }
    }

    /// The template registered for `key`.
    pub fn get(&self, key: &str) -> Option<&MessageFn> {
        self.entries.get(key)
    }

    /// True if `key` has a template.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no templates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl<K, F> FromIterator<(K, F)> for MessageTable
where
    K: Into<String>,
    F: Fn(&MessageParams<'_>) -> String + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, F)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MessageTable::new(), |table, (key, template)| table.with(key, template))
    }
}

impl fmt::Debug for MessageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageTable")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Renders the message for `key`: custom, then table, then unknown, then generic.
pub(crate) fn render(
    key: &str,
    params: &MessageParams<'_>,
    custom: Option<&MessageTable>,
    table: &MessageTable,
) -> String {
    if let Some(template) = custom.and_then(|c| c.get(key)).or_else(|| table.get(key)) {
        return template(params);
    }

    tracing::debug!(key, "no message registered for error key, using fallback");
    match table.get(keys::any::UNKNOWN) {
        Some(template) => template(params),
        None => generic_message(params),
    }
}

fn generic_message(params: &MessageParams<'_>) -> String {
    format!("{} contains errors", params.label)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn value_keys(value: &Value) -> String {
    match value.as_object() {
        Some(obj) if !obj.is_empty() => obj.keys().cloned().collect::<Vec<_>>().join(", "),
        _ => "no keys".to_string(),
    }
}

fn default_table() -> MessageTable {
    use keys::{any, array, boolean, number, shape, spec, string};

    MessageTable::new()
        .with(any::UNKNOWN, generic_message)
        .with(any::REQUIRED, |p| format!("{} is required", p.label))
        .with(any::ALLOW, |p| {
            format!("{} should be one of allowed values: {}", p.label, p.args_text())
        })
        .with(number::TYPE, |p| format!("{} should be a number", p.label))
        .with(number::GT, |p| format!("{} should be greater than {}", p.label, p.args_text()))
        .with(number::LT, |p| format!("{} should be lower than {}", p.label, p.args_text()))
        .with(number::GE, |p| {
            format!("{} should be greater or equal than {}", p.label, p.args_text())
        })
        .with(number::LE, |p| {
            format!("{} should be lower or equal than {}", p.label, p.args_text())
        })
        .with(number::RANGE, |p| {
            format!(
                "{} should be lower than {} and greater or equal {}",
                p.label,
                p.arg(1),
                p.arg(0)
            )
        })
        .with(string::EMPTY, |p| format!("{} should not be blank", p.label))
        .with(string::TYPE, |p| format!("{} should be a string", p.label))
        .with(string::MATCH, |p| {
            format!("{} should match the pattern {}", p.label, p.args_text())
        })
        .with(string::MIN_LENGTH, |p| {
            format!("{} should have at least {} characters", p.label, p.args_text())
        })
        .with(string::MAX_LENGTH, |p| {
            format!("{} should have at most {} characters", p.label, p.args_text())
        })
        .with(string::LENGTH, |p| {
            format!("{} should have only {} characters", p.label, p.args_text())
        })
        .with(string::EMAIL, |p| format!("{} should be a valid email address", p.label))
        .with(string::DIGITS, |p| format!("{} should contain only digits", p.label))
        .with(string::ALPHANUM, |p| {
            format!("{} should contain only alphanumeric characters", p.label)
        })
        .with(string::ISO_DATE, |p| format!("{} should be an ISO Date", p.label))
        .with(boolean::TYPE, |p| format!("{} should be a boolean", p.label))
        .with(boolean::TRUTHY, |p| format!("{} should be true", p.label))
        .with(boolean::FALSY, |p| format!("{} should be false", p.label))
        .with(shape::TYPE, |p| format!("{} should be an object", p.label))
        .with(shape::ALLOWED_KEYS, |p| {
            format!(
                "{} contains: {}, but should contain only keys: {}",
                p.label,
                value_keys(p.value),
                p.args_text()
            )
        })
        .with(shape::EXPECTED_KEYS, |p| {
            format!(
                "{} contains: {}, but should have keys: {}",
                p.label,
                value_keys(p.value),
                p.args_text()
            )
        })
        .with(shape::FORBIDDEN_KEYS, |p| {
            format!("{} contains forbidden keys: {}", p.label, p.args_text())
        })
        .with(array::TYPE, |p| format!("{} should be an array", p.label))
        .with(array::LENGTH, |p| format!("{} should have {} items", p.label, p.args_text()))
        .with(array::MIN_LENGTH, |p| {
            format!("{} should have at least {} items", p.label, p.args_text())
        })
        .with(array::MAX_LENGTH, |p| {
            format!("{} should have at most {} items", p.label, p.args_text())
        })
        .with(array::IN_RANGE, |p| {
            format!(
                "{} should have length between {} and {}",
                p.label,
                p.arg(0),
                p.arg(1)
            )
        })
        .with(array::SOME, |p| {
            format!("{} should have at least one item that follows the rule", p.label)
        })
        .with(array::EVERY, |p| format!("{} items should follow the rule", p.label))
        .with(spec::MISSING_REFERENCE, |p| {
            format!("{} refers to a recursive spec that no longer exists", p.label)
        })
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<MessageTable>();
    assert_sync::<MessageTable>();
};
