use serde_json::json;
use valtree_core::{
    serialize, serialize_with, Charset, CodecOptions, Dictionary, ErrorKind, Value, ValueType,
};

fn ser(value: &Value) -> String {
    serialize(value).expect("serialize failed")
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn serialize_booleans() {
    assert_eq!(ser(&Value::new(true)), "true");
    assert_eq!(ser(&Value::new(false)), "false");
}

#[test]
fn serialize_integers() {
    assert_eq!(ser(&Value::new(0)), "0");
    assert_eq!(ser(&Value::new(-42)), "-42");
    assert_eq!(ser(&Value::new(i64::MAX)), "9223372036854775807");
}

#[test]
fn serialize_doubles_keep_a_fraction() {
    assert_eq!(ser(&Value::new(1.0)), "1.0");
    assert_eq!(ser(&Value::new(3.25)), "3.25");
    assert_eq!(ser(&Value::new(-0.5)), "-0.5");
    assert_eq!(ser(&Value::new(0.1)), "0.1");
}

#[test]
fn serialize_huge_double_uses_exponent() {
    assert_eq!(ser(&Value::new(1e300)), "1e300");
}

#[test]
fn serialize_non_finite_double_is_unsupported() {
    let err = serialize(&Value::new(f64::NAN)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    let err = serialize(&Value::new(f64::INFINITY)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
}

#[test]
fn serialize_plain_string() {
    assert_eq!(ser(&Value::new("hello")), r#""hello""#);
    assert_eq!(ser(&Value::new("")), r#""""#);
}

#[test]
fn serialize_escapes_newline_and_quote() {
    let v = Value::new("line1\nwith \"quote\"");
    assert_eq!(ser(&v), r#""line1\nwith \"quote\"""#);
}

#[test]
fn serialize_escapes_full_set() {
    let v = Value::new("\u{8}\u{c}\n\r\t\\\"");
    assert_eq!(ser(&v), r#""\b\f\n\r\t\\\"""#);
}

#[test]
fn serialize_passes_other_characters_verbatim() {
    assert_eq!(ser(&Value::new("café ✓ /")), "\"café ✓ /\"");
    assert_eq!(ser(&Value::new("\u{1}")), "\"\u{1}\"");
}

// ============================================================================
// Absent payloads
// ============================================================================

#[test]
fn serialize_optional_absent_as_null() {
    let v = Value::builder()
        .value_type(ValueType::String)
        .optional(true)
        .build();
    assert_eq!(ser(&v), "null");
}

#[test]
fn serialize_uses_default_for_absent_payload() {
    let v = Value::builder()
        .value_type(ValueType::Integer)
        .default_value(9)
        .optional(true)
        .build();
    assert_eq!(ser(&v), "9");
}

#[test]
fn serialize_untyped_null_child() {
    let v = Value::builder()
        .untyped(json!({"a": null}))
        .optional(true)
        .recurse_children(true)
        .build();
    assert_eq!(ser(&v), r#"{"a":null}"#);
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn serialize_empty_containers() {
    assert_eq!(ser(&Value::dictionary()), "{}");
    assert_eq!(ser(&Value::list()), "[]");
}

#[test]
fn serialize_dictionary_in_key_order_when_unnumbered() {
    let v = Value::from_untyped(json!({"b": 1, "a": 2}));
    // All order numbers are -1, so ties fall back to the key.
    assert_eq!(ser(&v), r#"{"a":2,"b":1}"#);
}

#[test]
fn serialize_dictionary_by_order_number() {
    let mut map = Dictionary::new();
    map.insert("z".into(), Value::builder().payload(1).order_number(0).build());
    map.insert("a".into(), Value::builder().payload(2).order_number(1).build());
    map.insert("m".into(), Value::builder().payload(3).order_number(2).build());
    assert_eq!(ser(&Value::new(map)), r#"{"z":1,"a":2,"m":3}"#);
}

#[test]
fn serialize_list_by_order_number() {
    let items = vec![
        Value::builder().payload("c").order_number(2).build(),
        Value::builder().payload("a").order_number(0).build(),
        Value::builder().payload("b").order_number(1).build(),
    ];
    assert_eq!(ser(&Value::new(items)), r#"["a","b","c"]"#);
}

#[test]
fn serialize_list_keeps_storage_order_on_ties() {
    let v = Value::from_untyped(json!([3, 1, 2]));
    assert_eq!(ser(&v), "[3,1,2]");
}

#[test]
fn serialize_nested() {
    let v = Value::from_untyped(json!({"a": {"b": [1, 2.5, "x", true]}}));
    assert_eq!(ser(&v), r#"{"a":{"b":[1,2.5,"x",true]}}"#);
}

#[test]
fn serialize_escapes_keys() {
    let mut v = Value::dictionary();
    v.set("say \"hi\"", 1).unwrap();
    assert_eq!(ser(&v), r#"{"say \"hi\"":1}"#);
}

#[test]
fn serialize_output_is_valid_json() {
    let v = Value::from_untyped(json!({"s": "tab\there", "n": [1, 2], "d": 0.75}));
    let text = ser(&v);
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, json!({"s": "tab\there", "n": [1, 2], "d": 0.75}));
}

// ============================================================================
// Invalid roots and charsets
// ============================================================================

#[test]
fn serialize_rejects_invalid_tree() {
    let v = Value::typed(ValueType::Integer);
    assert_eq!(serialize(&v).unwrap_err().kind(), ErrorKind::InvalidParameter);

    let nested = Value::from_untyped(json!({"a": null}));
    assert_eq!(
        serialize(&nested).unwrap_err().kind(),
        ErrorKind::InvalidParameter
    );
}

#[test]
fn serialize_rejects_broken_root_with_its_error() {
    let broken = Value::builder()
        .payload(true)
        .value_type(ValueType::List)
        .build();
    let err = serialize(&broken).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(Some(&err), broken.error());
}

#[test]
fn serialize_with_ascii_rejects_non_ascii() {
    let options = CodecOptions::with_charset(Charset::Ascii);
    let v = Value::from_untyped(json!({"name": "café"}));
    let err = serialize_with(&v, &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unencodable);
    assert!(err.message().starts_with("Field \"name\" is inappropriate"));
    assert_eq!(
        serialize_with(&Value::new("plain"), &options).unwrap(),
        r#""plain""#
    );
}

#[test]
fn serialize_with_latin1_accepts_latin1_only() {
    let options = CodecOptions::with_charset(Charset::Latin1);
    assert_eq!(
        serialize_with(&Value::new("café"), &options).unwrap(),
        "\"café\""
    );
    assert_eq!(
        serialize_with(&Value::new("✓"), &options).unwrap_err().kind(),
        ErrorKind::Unencodable
    );
}

#[test]
fn serialize_checks_keys_against_charset() {
    let options = CodecOptions::with_charset(Charset::Ascii);
    let mut v = Value::dictionary();
    v.set("ключ", 1).unwrap();
    let err = serialize_with(&v, &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unencodable);
    assert!(err.message().starts_with("Key \"ключ\""));
}
