//! String rules. Lengths count Unicode scalar values.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::keys::string::{
    ALPHANUM, DIGITS, EMAIL, EMPTY, ISO_DATE, LENGTH, MATCH, MAX_LENGTH, MIN_LENGTH, TYPE,
};
use crate::validator::{to_validator, to_validator_with_args, Validator};

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

static ALPHANUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .unwrap()
});

// Date-time with minutes, optional seconds and fraction, and a zone.
static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[0-9]{4}-[01][0-9]-[0-3][0-9]T[0-2][0-9]:[0-5][0-9](:[0-5][0-9](\.[0-9]+)?)?([+-][0-2][0-9]:[0-5][0-9]|Z)",
    )
    .unwrap()
});

/// A compiled pattern, reported in failure arguments as its source text.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Pattern)
    }

    /// The source pattern, as reported in failure arguments.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `text` contains a match.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern(regex)
    }
}

impl From<Pattern> for Value {
    fn from(pattern: Pattern) -> Self {
        Value::String(pattern.as_str().to_string())
    }
}

fn text(value: &Value, holds: impl Fn(&str) -> bool) -> bool {
    value.as_str().map_or(true, holds)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Fails on anything that is not a JSON string.
pub fn is_string() -> Validator {
    to_validator(TYPE, |value, _| value.is_string())
}

/// Fails on `""`.
pub fn is_not_empty() -> Validator {
    to_validator(EMPTY, |value, _| text(value, |s| !s.is_empty()))
}

/// `local@domain.tld`, or `local@[1.2.3.4]`.
pub fn is_email() -> Validator {
    to_validator(EMAIL, |value, _| text(value, |s| EMAIL_RE.is_match(s)))
}

/// ASCII digits only.
pub fn is_digits() -> Validator {
    to_validator(DIGITS, |value, _| text(value, |s| DIGITS_RE.is_match(s)))
}

/// ASCII letters and digits only.
pub fn is_alphanum() -> Validator {
    to_validator(ALPHANUM, |value, _| text(value, |s| ALPHANUM_RE.is_match(s)))
}

/// Contains an ISO 8601 date-time such as `2020-01-31T10:00:00.000Z`.
pub fn is_iso_date() -> Validator {
    to_validator(ISO_DATE, |value, _| text(value, |s| ISO_DATE_RE.is_match(s)))
}

/// Strings matching `pattern`. Fails to build if the pattern is invalid.
///
/// # Example
///
/// ```rust
/// use specimen::{validators::string, Params};
/// use serde_json::json;
///
/// let slug = string::matches(r"^[a-z-]+$").unwrap();
/// assert!(slug.check(&json!("hello-world"), &Params::default()).is_none());
///
/// let outcome = slug.check(&json!("Hello"), &Params::default()).unwrap();
/// assert_eq!(outcome.args, Some(json!("^[a-z-]+$")));
///
/// assert!(string::matches("(").is_err());
/// ```
pub fn matches(pattern: &str) -> Result<Validator, regex::Error> {
    Pattern::new(pattern).map(matches_pattern)
}

/// Strings matching an already compiled pattern.
pub fn matches_pattern(pattern: impl Into<Pattern>) -> Validator {
    to_validator_with_args(MATCH, |pattern: &Pattern, value, _| {
        text(value, |s| pattern.is_match(s))
    })(pattern.into())
}

/// At least `min` characters.
pub fn min_length(min: usize) -> Validator {
    to_validator_with_args(MIN_LENGTH, |min: &usize, value, _| {
        text(value, |s| char_len(s) >= *min)
    })(min)
}

/// At most `max` characters.
pub fn max_length(max: usize) -> Validator {
    to_validator_with_args(MAX_LENGTH, |max: &usize, value, _| {
        text(value, |s| char_len(s) <= *max)
    })(max)
}

/// Exactly `len` characters.
pub fn length(len: usize) -> Validator {
    to_validator_with_args(LENGTH, |len: &usize, value, _| text(value, |s| char_len(s) == *len))(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::test_support::{key_of, passes};
    use serde_json::json;

    #[test]
    fn test_type_and_emptiness() {
        assert!(passes(&is_string(), json!("")));
        assert_eq!(key_of(&is_string(), json!(1)), Some(TYPE.to_string()));
        assert_eq!(key_of(&is_not_empty(), json!("")), Some(EMPTY.to_string()));
        assert!(passes(&is_not_empty(), json!(" ")));
        assert!(passes(&is_not_empty(), json!(5)));
    }

    #[test]
    fn test_email() {
        for ok in ["a@b.io", "first.last@sub.example.com", "\"odd name\"@example.com", "x@[10.0.0.1]"] {
            assert!(passes(&is_email(), json!(ok)), "{ok}");
        }
        for bad in ["plain", "a@b", "a b@c.com", "a@b.c", "@example.com"] {
            assert!(!passes(&is_email(), json!(bad)), "{bad}");
        }
    }

    #[test]
    fn test_character_classes() {
        assert!(passes(&is_digits(), json!("0123")));
        assert!(!passes(&is_digits(), json!("12a")));
        assert!(!passes(&is_digits(), json!("")));
        assert!(passes(&is_alphanum(), json!("abC12")));
        assert!(!passes(&is_alphanum(), json!("ab_12")));
    }

    #[test]
    fn test_iso_date() {
        for ok in ["2020-01-31T10:00:00.000Z", "2020-01-31T10:00:00+02:00", "2020-01-31T10:00Z"] {
            assert!(passes(&is_iso_date(), json!(ok)), "{ok}");
        }
        for bad in ["2020-01-31", "31/01/2020 10:00", "2020-01-31T10:00"] {
            assert!(!passes(&is_iso_date(), json!(bad)), "{bad}");
        }
    }

    #[test]
    fn test_lengths_count_characters() {
        assert!(passes(&min_length(3), json!("héé")));
        assert!(!passes(&min_length(4), json!("héé")));
        assert!(passes(&max_length(2), json!("日本")));
        assert!(!passes(&max_length(1), json!("日本")));
        assert!(passes(&length(0), json!("")));
        assert_eq!(key_of(&length(2), json!("abc")), Some(LENGTH.to_string()));
    }

    #[test]
    fn test_matches() {
        let rule = matches(r"^\d{3}$").unwrap();
        assert!(passes(&rule, json!("123")));
        assert_eq!(key_of(&rule, json!("12")), Some(MATCH.to_string()));

        let precompiled = matches_pattern(Regex::new("^a").unwrap());
        assert!(passes(&precompiled, json!("abc")));
        assert!(passes(&precompiled, json!(10)));
    }
}
