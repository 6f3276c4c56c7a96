//! Telling find options apart from other query-builder argument shapes.

use findom::{FindOptions, FindOptionsError, is_find_options};
use serde_json::{Value as JsonValue, json};

#[test]
fn overloaded_arguments_are_told_apart() {
    // entity ids
    assert!(!is_find_options(&json!(42)));
    assert!(!is_find_options(&json!("6f1c1b0e")));
    // plain filter object
    assert!(!is_find_options(&json!({ "email": "ann@example.com" })));
    // find options
    assert!(is_find_options(&json!({ "where": { "email": "ann@example.com" } })));
}

#[test]
fn documented_examples_hold() {
    assert!(is_find_options(&json!({ "skip": "5" })));
    assert!(!is_find_options(&json!({ "foo": "bar" })));
    assert!(!is_find_options(&JsonValue::Null));
}

#[test]
fn predicate_agrees_with_parse() {
    let samples = [
        json!({ "skip": "5" }),
        json!({ "take": false }),
        json!({ "cache": { "id": "users" } }),
        json!({ "order": "id" }),
        json!({ "lock": { "mode": "optimistic", "version": 3 } }),
        json!({ "foo": "bar", "relations": ["posts"] }),
        json!([]),
        JsonValue::Null,
    ];
    for sample in samples {
        assert_eq!(
            is_find_options(&sample),
            FindOptions::from_value(sample.clone()).is_ok(),
            "disagreement on {sample}"
        );
    }
}

#[test]
fn lock_is_carried_without_interpretation() {
    let lock = json!({ "mode": "optimistic", "version": 3 });
    let options = FindOptions::from_value(json!({ "lock": lock.clone() })).unwrap();
    assert_eq!(options.lock, Some(lock));
    assert_eq!(options.present_fields(), ["lock"]);
}

#[test]
fn rejected_values_explain_why() {
    let err = FindOptions::from_value(json!(["where"])).unwrap_err();
    assert!(matches!(err, FindOptionsError::NotAnObject { found: "array" }));
    assert_eq!(err.to_string(), "find options must be an object, got array");

    let err = "{ not json".parse::<FindOptions>().unwrap_err();
    assert!(matches!(err, FindOptionsError::Json(_)));
}
