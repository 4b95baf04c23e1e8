mod common;

use anycoding::{encode, from_json, path, to_json, Error, Value};
use chrono::{DateTime, Utc};
use common::{tree, Profile, Scenario};
use serde_json::json;
use url::Url;

// ============================================================================
// Parsing and printing
// ============================================================================

#[test]
fn parse_keeps_integers_and_floats_apart() {
    let doc = tree(r#"{"i": 1, "f": 1.0, "n": null, "s": "x", "b": false}"#);
    assert_eq!(doc["i"], Value::Integer(1));
    assert_eq!(doc["f"], Value::Float(1.0));
    assert!(doc["n"].is_null());
}

#[test]
fn huge_unsigned_becomes_float() {
    let doc = tree("18446744073709551615");
    assert!(matches!(doc, Value::Float(_)));
}

#[test]
fn floats_reparse_to_the_same_bits() {
    let x = 128252250630.39717_f64;
    let mut doc = Value::Mapping(Default::default());
    doc.set("a", x);
    let text = doc.to_json_string().unwrap();
    let back = Value::from_json_str(&text).unwrap();
    assert_eq!(back["a"].as_f64().map(f64::to_bits), Some(x.to_bits()));
    assert_eq!(back, doc);
    assert_eq!(from_json::<f64>(&to_json(&x).unwrap()).unwrap(), x);
}

#[test]
fn print_is_sorted_and_compact() {
    let doc = tree(r#"{"b": [1, null], "a": "x"}"#);
    assert_eq!(doc.to_json_string().unwrap(), r#"{"a":"x","b":[1,null]}"#);
}

#[test]
fn pretty_print_is_indented() {
    let doc = tree(r#"{"a": [1]}"#);
    assert_eq!(doc.to_json_pretty().unwrap(), "{\n  \"a\": [\n    1\n  ]\n}");
}

#[test]
fn invalid_text_is_json_error() {
    assert!(matches!(Value::from_json_str("{nope"), Err(Error::Json(_))));
}

#[test]
fn display_renders_single_line() {
    assert_eq!(tree(r#"{"a": [1, "s"]}"#).to_string(), r#"{"a":[1,"s"]}"#);
    assert_eq!(Value::from("bare").to_string(), "bare");
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn non_finite_float_is_not_valid_for_serialization() {
    let mut doc = tree(r#"{"a": {"list": [1.0, 2.0]}}"#);
    doc.set(path!["a", "list", 1], f64::INFINITY);
    match doc.to_json_string().unwrap_err() {
        Error::NotValidForSerialization(message) => {
            assert!(message.contains("/a/list/1"), "message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(doc.to_json_pretty().is_err());
    assert!(serde_json::Value::try_from(doc).is_err());
}

#[test]
fn nan_in_typed_value_fails_at_the_boundary() {
    assert!(matches!(
        to_json(&vec![1.0, f64::NAN]),
        Err(Error::NotValidForSerialization(_))
    ));
}

// ============================================================================
// serde_json interop
// ============================================================================

#[test]
fn from_serde_json_value() {
    let value = Value::from(json!({"a": [1, 2.5, null, true, "s"]}));
    assert_eq!(value, tree(r#"{"a": [1, 2.5, null, true, "s"]}"#));
}

#[test]
fn into_serde_json_value() {
    let value = tree(r#"{"a": [1, 2.5, null]}"#);
    let json = serde_json::Value::try_from(value).unwrap();
    assert_eq!(json, json!({"a": [1, 2.5, null]}));
}

#[test]
fn serde_traits_work_with_serde_json_directly() {
    let value: Value = serde_json::from_str(r#"[{"k": -1}]"#).unwrap();
    assert_eq!(value, tree(r#"[{"k": -1}]"#));
    assert_eq!(serde_json::to_string(&value).unwrap(), r#"[{"k":-1}]"#);
}

// ============================================================================
// Typed double round-trip through text
// ============================================================================

#[test]
fn typed_double_roundtrip_through_text() {
    let profile = Profile::sample();
    let text = to_json(&profile).unwrap();
    let once: Profile = from_json(&text).unwrap();
    let twice: Profile = from_json(&to_json(&once).unwrap()).unwrap();
    assert_eq!(once, profile);
    assert_eq!(twice, profile);
}

#[test]
fn dates_travel_as_epoch_seconds_and_urls_as_strings() {
    let date = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).unwrap();
    assert_eq!(to_json(&date).unwrap(), "1600000000.0");
    let back: DateTime<Utc> = from_json("1600000000").unwrap();
    assert_eq!(back, date);

    let url = Url::parse("https://example.com/").unwrap();
    assert_eq!(to_json(&url).unwrap(), r#""https://example.com/""#);
}

#[test]
fn scenario_text_form() {
    let text = to_json(&Scenario::sample()).unwrap();
    assert_eq!(
        text,
        r#"{"bool":true,"items":[null,1,2],"optionalInt":null,"text":"📀!"}"#
    );
    let back: Scenario = from_json(&text).unwrap();
    assert_eq!(back, Scenario::sample());
    assert_eq!(encode(&back).unwrap(), tree(&text));
}
