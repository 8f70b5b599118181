//! Codec Tests
//!
//! Tests verify:
//! - decode(encode(v)) == v for every numeric width
//! - Complex and structured values round-trip
//! - Malformed input maps to the right decode reason

use std::collections::BTreeMap;

use jsonkv::codec::{decode, encode};
use jsonkv::{Complex32, Complex64, Json, StoreError, StoreValue};
use serde::{Deserialize, Serialize};

fn round_trip<T: StoreValue + PartialEq + std::fmt::Debug>(value: T) {
    let raw = encode(&value).unwrap();
    let back: T = decode(&raw).unwrap();
    assert_eq!(back, value, "round trip through {raw:?}");
}

fn decode_reason<T: StoreValue + std::fmt::Debug>(raw: &str) -> String {
    match decode::<T>(raw) {
        Err(StoreError::Decode { reason }) => reason,
        other => panic!("expected decode error for {raw:?}, got {other:?}"),
    }
}

// =============================================================================
// Numeric Tests
// =============================================================================

macro_rules! round_trip_bounds {
    ($($t:ty),*) => {
        $(
            round_trip(<$t>::MIN);
            round_trip(<$t>::MAX);
            round_trip(0 as $t);
        )*
    };
}

#[test]
fn test_integer_bounds_round_trip() {
    round_trip_bounds!(i8, i16, i32, i64, i128, isize);
    round_trip_bounds!(u8, u16, u32, u64, u128, usize);
}

#[test]
fn test_float_round_trip() {
    round_trip(f32::MIN);
    round_trip(f32::MAX);
    round_trip(f32::EPSILON);
    round_trip(f64::MIN);
    round_trip(f64::MAX);
    round_trip(std::f64::consts::PI);
    round_trip(-0.0001f64);
}

#[test]
fn test_integer_decoding_is_plain_decimal() {
    assert_eq!(decode::<i32>("42").unwrap(), 42);
    assert_eq!(decode::<i64>("-9000").unwrap(), -9000);
    assert_eq!(decode::<u16>("+7").unwrap(), 7);
}

#[test]
fn test_malformed_numbers() {
    assert_eq!(decode_reason::<i32>("forty-two"), "not a number");
    assert_eq!(decode_reason::<i32>(""), "not a number");
    assert_eq!(decode_reason::<i32>("1.5"), "not a number");
    assert_eq!(decode_reason::<u32>("-1"), "not a number");
    assert_eq!(decode_reason::<f64>("1,5"), "not a number");
}

// =============================================================================
// Complex Tests
// =============================================================================

#[test]
fn test_complex_round_trip() {
    round_trip(Complex64::new(1.5, -2.25));
    round_trip(Complex64::new(-1e-10, 3.0));
    round_trip(Complex64::new(0.0, -0.0));
    round_trip(Complex32::new(f32::MAX, f32::MIN));
}

#[test]
fn test_complex_encoding() {
    assert_eq!(encode(&Complex64::new(1.0, 2.0)).unwrap(), "(1+2i)");
    assert_eq!(encode(&Complex32::new(0.5, -0.5)).unwrap(), "(0.5-0.5i)");
}

#[test]
fn test_complex_is_not_a_number() {
    assert_eq!(decode_reason::<f64>("(1+2i)"), "not a number");
    assert_eq!(decode_reason::<Complex64>("1.5"), "not a complex number");
}

// =============================================================================
// Structured Tests
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    age: u8,
    tags: Vec<String>,
    limits: BTreeMap<String, f64>,
}

fn sample_profile() -> Profile {
    Profile {
        name: "ada".to_string(),
        age: 36,
        tags: vec!["admin".to_string(), "ops".to_string()],
        limits: BTreeMap::from([("cpu".to_string(), 0.5)]),
    }
}

#[test]
fn test_struct_round_trip() {
    round_trip(Json(sample_profile()));
    round_trip(Json(Option::<u32>::None));
    round_trip(Json(vec![1u8, 2, 3]));
}

#[test]
fn test_struct_is_stored_as_json_text() {
    let raw = encode(&Json(vec!["a".to_string(), "b".to_string()])).unwrap();
    assert_eq!(raw, r#"["a","b"]"#);
}

#[test]
fn test_value_round_trip() {
    let value = serde_json::json!({"a": [1, 2, {"b": null}], "c": "d"});
    round_trip(value);
}

#[test]
fn test_invalid_json() {
    assert_eq!(decode_reason::<Json<Profile>>("{\"name\":"), "invalid JSON");
    assert_eq!(decode_reason::<Json<Profile>>("{\"name\":\"x\"}"), "invalid JSON");
    assert_eq!(decode_reason::<serde_json::Value>("not json"), "invalid JSON");
}

#[test]
fn test_string_needs_no_json_quoting() {
    assert_eq!(encode(&"hello".to_string()).unwrap(), "hello");
    assert_eq!(decode::<String>("{not json}").unwrap(), "{not json}");
}
