mod common;

use anycoding::{equal_flattened, flatten, is_absent, structural_eq, Error, Value};
use common::tree;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Structural equality
// ============================================================================

#[test]
fn mappings_ignore_key_order() {
    assert_eq!(tree(r#"{"a": 1, "b": [true]}"#), tree(r#"{"b": [true], "a": 1}"#));
}

#[test]
fn mappings_with_different_keys_differ() {
    assert_ne!(tree(r#"{"a": 1}"#), tree(r#"{"a": 1, "b": 2}"#));
    assert_ne!(tree(r#"{"a": 1}"#), tree(r#"{"b": 1}"#));
}

#[test]
fn sequences_compare_pairwise_in_order() {
    assert_eq!(tree("[1, [2, 3]]"), tree("[1, [2, 3]]"));
    assert_ne!(tree("[1, 2]"), tree("[2, 1]"));
    assert_ne!(tree("[1, 2]"), tree("[1, 2, null]"));
}

#[test]
fn integer_and_float_are_different_variants() {
    assert!(!structural_eq(&Value::Integer(1), &Value::Float(1.0)));
}

#[test]
fn nan_equals_nan() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_eq!(Value::from(vec![f64::NAN]), Value::from(vec![f64::NAN]));
}

#[test]
fn signed_zeros_are_equal_and_hash_equal() {
    let pos = Value::Float(0.0);
    let neg = Value::Float(-0.0);
    assert_eq!(pos, neg);
    assert_eq!(hash_of(&pos), hash_of(&neg));
}

#[test]
fn null_only_equals_null() {
    assert_eq!(Value::Null, Value::Null);
    assert_ne!(Value::Null, Value::from(false));
    assert_ne!(Value::Null, tree("{}"));
}

#[test]
fn scalar_comparisons() {
    assert_eq!(Value::from("x"), "x");
    assert_eq!(Value::from(3), 3);
    assert_eq!(Value::from(3i64), 3i64);
    assert_eq!(Value::from(2.5), 2.5);
    assert_eq!(Value::from(true), true);
    assert_eq!(Value::from("s"), "s".to_string());
}

// ============================================================================
// Hashing
// ============================================================================

#[test]
fn equal_trees_hash_equal() {
    let a = tree(r#"{"x": [1, 2.5, "s"], "y": {"z": null}}"#);
    let b = tree(r#"{"y": {"z": null}, "x": [1, 2.5, "s"]}"#);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn values_work_as_set_members() {
    let mut set = HashSet::new();
    set.insert(tree(r#"{"a": 1}"#));
    set.insert(tree(r#"{"a": 1}"#));
    set.insert(Value::Float(f64::NAN));
    set.insert(Value::Float(f64::NAN));
    set.insert(Value::Integer(1));
    set.insert(Value::Float(1.0));
    assert_eq!(set.len(), 4);
}

// ============================================================================
// Optional flattening
// ============================================================================

#[test]
fn nested_options_flatten() {
    let value = Value::from(5);
    let wrapped: Option<Option<Value>> = Some(Some(value.clone()));
    assert_eq!(flatten(&wrapped), Some(&value));

    let inner_none: Option<Option<Value>> = Some(None);
    assert!(is_absent(&inner_none));

    let outer_none: Option<Option<Value>> = None;
    assert!(is_absent(&outer_none));
}

#[test]
fn null_counts_as_absent() {
    assert!(is_absent(&Value::Null));
    assert!(is_absent(&Some(Value::Null)));
    assert!(!is_absent(&Value::from(0)));
    assert!(!is_absent(&tree("[]")));
}

#[test]
fn borrowed_and_boxed_values_flatten() {
    let value = tree(r#"{"k": "v"}"#);
    let borrowed: Option<&Value> = value.at("k");
    assert_eq!(flatten(&borrowed), Some(&Value::from("v")));
    let boxed = Box::new(Value::Null);
    assert!(is_absent(&boxed));
}

#[test]
fn equal_flattened_treats_absences_alike() {
    let none: Option<Value> = None;
    assert!(equal_flattened(&none, &Value::Null));
    assert!(equal_flattened(&Some(Some(Value::from(1))), &Value::from(1)));
    assert!(!equal_flattened(&none, &Value::from(0)));
    assert!(!equal_flattened(&Some(Value::from(1)), &Value::from(1.0)));
}

// ============================================================================
// Construction from wide integers
// ============================================================================

#[test]
fn wide_integers_convert_when_they_fit() {
    assert_eq!(Value::try_from(7u64).unwrap(), Value::Integer(7));
    assert_eq!(Value::try_from(7usize).unwrap(), Value::Integer(7));
    assert_eq!(Value::try_from(-7i128).unwrap(), Value::Integer(-7));
    assert_eq!(Value::try_from(i64::MAX as u128).unwrap(), Value::Integer(i64::MAX));
}

#[test]
fn wide_integers_out_of_range_fail() {
    assert!(matches!(
        Value::try_from(u64::MAX),
        Err(Error::ConversionFailure { to: "i64", .. })
    ));
    assert!(Value::try_from(i128::MIN).is_err());
    assert!(Value::try_from(u128::MAX).is_err());
}
