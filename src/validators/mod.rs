//! Standard validators, grouped by the kind of value they check.
//!
//! Each group reports the error keys of the matching [`keys`](crate::keys)
//! module. Type validators (`is_number`, `is_string`, ...) report a mismatch;
//! every other validator has no opinion about values of the wrong type, so
//! `flow([number::is_number(), number::ge(0)])` reports a string once, as a
//! type error. All of them except `any::required` and `boolean::is_truthy`
//! skip null values.

pub mod any;
pub mod array;
pub mod boolean;
pub mod number;
pub mod shape;
pub mod string;

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;

    use crate::validator::{Params, Validator};

    pub(crate) fn passes(validator: &Validator, value: Value) -> bool {
        validator.check(&value, &Params::default()).is_none()
    }

    pub(crate) fn key_of(validator: &Validator, value: Value) -> Option<String> {
        validator
            .check(&value, &Params::default())
            .map(|outcome| outcome.key)
    }
}
