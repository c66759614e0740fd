//! Stable error keys reported by the standard validators.
//!
//! Keys are plain, namespaced strings. They are the contract between
//! validators and message tables, so custom messages can be registered for
//! them without depending on any Rust type.

/// Keys for rules that apply to any value.
pub mod any {
    /// Fallback key used when no message exists for a reported key.
    pub const UNKNOWN: &str = "any.unknown";
    pub const REQUIRED: &str = "any.required";
    pub const ALLOW: &str = "any.allow";
}

pub mod number {
    pub const TYPE: &str = "number.type";
    pub const GE: &str = "number.ge";
    pub const GT: &str = "number.gt";
    pub const LE: &str = "number.le";
    pub const LT: &str = "number.lt";
    pub const RANGE: &str = "number.range";
}

pub mod string {
    pub const EMPTY: &str = "string.empty";
    pub const TYPE: &str = "string.type";
    pub const EMAIL: &str = "string.email";
    pub const MATCH: &str = "string.match";
    pub const MIN_LENGTH: &str = "string.min.length";
    pub const MAX_LENGTH: &str = "string.max.length";
    pub const LENGTH: &str = "string.exact.length";
    pub const DIGITS: &str = "string.digits";
    pub const ALPHANUM: &str = "string.alphanum";
    pub const ISO_DATE: &str = "string.iso.date";
}

pub mod boolean {
    pub const TYPE: &str = "boolean.type";
    pub const TRUTHY: &str = "boolean.truthy";
    pub const FALSY: &str = "boolean.falsy";
}

pub mod shape {
    pub const TYPE: &str = "shape.type";
    pub const ALLOWED_KEYS: &str = "shape.allowed.keys";
    pub const FORBIDDEN_KEYS: &str = "shape.forbidden.keys";
    pub const EXPECTED_KEYS: &str = "shape.expected.keys";
}

pub mod array {
    pub const TYPE: &str = "array.type";
    pub const MIN_LENGTH: &str = "array.min.length";
    pub const MAX_LENGTH: &str = "array.max.length";
    pub const IN_RANGE: &str = "array.range";
    pub const LENGTH: &str = "array.exact.length";
    pub const EVERY: &str = "array.every";
    pub const SOME: &str = "array.some";
}

/// Keys reported by the combinators themselves.
pub mod spec {
    /// A `recursive` reference evaluated after its spec was dropped.
    pub const MISSING_REFERENCE: &str = "spec.missing.reference";
}

/// Every key above, in declaration order.
pub const ALL: &[&str] = &[
    any::UNKNOWN,
    any::REQUIRED,
    any::ALLOW,
    number::TYPE,
    number::GE,
    number::GT,
    number::LE,
    number::LT,
    number::RANGE,
    string::EMPTY,
    string::TYPE,
    string::EMAIL,
    string::MATCH,
    string::MIN_LENGTH,
    string::MAX_LENGTH,
    string::LENGTH,
    string::DIGITS,
    string::ALPHANUM,
    string::ISO_DATE,
    boolean::TYPE,
    boolean::TRUTHY,
    boolean::FALSY,
    shape::TYPE,
    shape::ALLOWED_KEYS,
    shape::FORBIDDEN_KEYS,
    shape::EXPECTED_KEYS,
    array::TYPE,
    array::MIN_LENGTH,
    array::MAX_LENGTH,
    array::IN_RANGE,
    array::LENGTH,
    array::EVERY,
    array::SOME,
    spec::MISSING_REFERENCE,
];
