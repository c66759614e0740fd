//! Tests for paths and labels of formatted errors.

use serde_json::json;
use specimen::spec;
use specimen::validators::{any, number, string};
use specimen::{validate_all, Path, PathSegment};

#[test]
fn test_path_segments_distinguish_fields_and_indices() {
    let rules = spec::shape([(
        "users",
        spec::collection(spec::shape([("email", spec::flow([string::is_email()]))])),
    )]);

    let value = json!({"users": [{"email": "a@b.io"}, {"email": "x"}]});

    let errors = validate_all(&rules, &value).unwrap();
    let path = errors.first().path();

    assert_eq!(path.to_string(), "users[1].email");
    assert_eq!(
        path.as_slice(),
        &[
            PathSegment::field("users"),
            PathSegment::index(1),
            PathSegment::field("email")
        ]
    );
    assert_eq!(path.last().and_then(PathSegment::as_field), Some("email"));
}

#[test]
fn test_index_label_is_the_index() {
    let scores = spec::collection(spec::flow([number::le(100)]));
    let value = json!([50, 150]);
    let errors = validate_all(&scores, &value).unwrap();

    assert_eq!(errors.first().path().to_string(), "[1]");
    assert_eq!(errors.first().message, "1 should be lower or equal than 100");
}

#[test]
fn test_nested_collections() {
    let grid = spec::collection(spec::collection(spec::flow([number::is_number()])));
    let value = json!([[1, 2], [3, "x"]]);
    let errors = validate_all(&grid, &value).unwrap();
    assert_eq!(errors.first().path().to_string(), "[1][1]");
}

#[test]
fn test_designate_relabels_without_moving() {
    let rules = spec::shape([(
        "addr",
        spec::designate(
            "Mailing Address",
            spec::shape([("city", spec::flow([any::required()]))]),
        ),
    )]);

    let value = json!({"addr": {}});

    let errors = validate_all(&rules, &value).unwrap();
    let error = errors.first();
    assert_eq!(error.path().to_string(), "addr.city");
    assert_eq!(error.message, "city is required");

    let ctx = error.context().unwrap();
    let parent = ctx.parent().unwrap();
    assert_eq!(parent.label(), "Mailing Address");
    assert_eq!(parent.key(), Some(&PathSegment::field("addr")));
}

#[test]
fn test_at_path_query() {
    let rules = spec::shape([
        ("a", spec::flow([any::required(), number::is_number()])),
        ("b", spec::flow([any::required()])),
    ]);
    let value = json!({"a": "x"});
    let errors = validate_all(&rules, &value).unwrap();

    let at_a = errors.at_path(&Path::from_segments(vec!["a".into()]));
    assert_eq!(at_a.len(), 1);
    assert_eq!(at_a[0].key, "number.type");
    assert!(errors.at_path(&Path::root()).is_empty());
}

#[test]
fn test_error_context_keeps_container() {
    let rules = spec::shape([("age", spec::flow([number::ge(18)]))]);
    let input = json!({"age": 3, "name": "kid"});

    let errors = validate_all(&rules, &input).unwrap();
    let ctx = errors.first().context().unwrap();
    assert_eq!(ctx.current(), Some(&input));
    assert_eq!(ctx.current().and_then(|c| c.get("name")), Some(&json!("kid")));
}

#[test]
fn test_display_lists_every_error() {
    let rules = spec::shape([
        ("a", spec::flow([any::required()])),
        ("b", spec::flow([any::required()])),
    ]);
    let report = validate_all(&rules, &json!({})).unwrap().to_string();

    assert!(report.starts_with("Validation failed with 2 error(s):"));
    assert!(report.contains("1. a: a is required"));
    assert!(report.contains("2. b: b is required"));
}
