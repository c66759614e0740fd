//! Tests for message resolution through runners.

use std::sync::Arc;

use serde_json::json;
use specimen::spec;
use specimen::validators::{any, array, boolean, number, shape, string};
use specimen::{
    create_validate_function, keys, validate_all, validate_all_with_opts, MessageTable,
    RunnerConfig, ValidateOptions,
};

#[test]
fn test_default_messages_for_standard_rules() {
    let rules = spec::shape([
        ("id", spec::flow([string::is_digits()])),
        ("email", spec::flow([string::is_email()])),
        ("role", spec::flow([any::allow(["admin", "user"])])),
        ("tos", spec::flow([boolean::is_truthy()])),
        ("tags", spec::flow([array::in_range(1, 3)])),
        ("meta", spec::flow([shape::allowed_keys(["a"])])),
        ("score", spec::flow([number::in_range(0, 10)])),
    ]);
    let input = json!({
        "id": "12a",
        "email": "nope",
        "role": "root",
        "tags": [],
        "meta": {"a": 1, "b": 2},
        "score": 10
    });

    let errors = validate_all(&rules, &input).unwrap();
    assert_eq!(
        errors.messages(),
        vec![
            "id should contain only digits",
            "email should be a valid email address",
            "role should be one of allowed values: admin, user",
            "tos should be true",
            "tags should have length between 1 and 3",
            "meta contains: a, b, but should contain only keys: a",
            "score should be lower than 10 and greater or equal 0",
        ]
    );
}

#[test]
fn test_runner_table_replaces_defaults_entirely() {
    let table = MessageTable::new()
        .with(keys::any::REQUIRED, |p| format!("{}: obligatoire", p.label))
        .with(keys::any::UNKNOWN, |p| format!("{}: invalide", p.label));
    let runner = create_validate_function(RunnerConfig::exhaustive().messages(table));

    let rules = spec::shape([
        ("nom", spec::flow([any::required()])),
        ("age", spec::flow([number::ge(18)])),
    ]);
    let value = json!({"age": 3});
    let errors = runner.validate(&rules, &value).unwrap();
    assert_eq!(errors.messages(), vec!["nom: obligatoire", "age: invalide"]);
}

#[test]
fn test_merged_table_keeps_other_defaults() {
    let overrides = MessageTable::new().with(keys::number::GE, |p| {
        format!("{} must be at least {}", p.label, p.args_text())
    });
    let runner = create_validate_function(
        RunnerConfig::exhaustive().messages(MessageTable::defaults().merge(&overrides)),
    );

    let rules = spec::shape([
        ("age", spec::flow([number::ge(18)])),
        ("name", spec::flow([any::required()])),
    ]);
    let value = json!({"age": 3});
    let errors = runner.validate(&rules, &value).unwrap();
    assert_eq!(errors.messages(), vec!["age must be at least 18", "name is required"]);
}

#[test]
fn test_custom_messages_see_the_path() {
    let options = ValidateOptions::with_messages(
        MessageTable::new().with(keys::any::REQUIRED, |p| format!("missing {}", p.path())),
    );
    let rules = spec::shape([("items", spec::collection(spec::shape([("sku", spec::flow([any::required()]))])))]);

    let value = json!({"items": [{}, {"sku": 1}, {}]});

    let errors = validate_all_with_opts(&rules, &options, &value).unwrap();
    assert_eq!(errors.messages(), vec!["missing items[0].sku", "missing items[2].sku"]);
}

#[test]
fn test_tables_are_shared_not_copied() {
    let table = Arc::new(MessageTable::defaults().merge(&MessageTable::new()));
    let a = RunnerConfig::new().messages(Arc::clone(&table));
    let b = RunnerConfig::first_failure().messages(Arc::clone(&table));

    assert!(std::ptr::eq(a.message_table(), b.message_table()));
    assert_eq!(a.message_table().len(), keys::ALL.len());
}

#[test]
fn test_empty_table_never_fails_to_render() {
    let runner = create_validate_function(RunnerConfig::exhaustive().messages(MessageTable::new()));
    let errors = runner.validate(&spec::flow([any::required()]), &json!(null)).unwrap();
    assert_eq!(errors.first().message, "value contains errors");
}
