// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{decode, encode, Error, Value};

fn round_trip(value: Value) {
    let bytes = encode(&value);
    assert_eq!(decode(&bytes), Ok(value));
}

#[test]
fn scalars() {
    round_trip(Value::Bool(false));
    round_trip(Value::Bool(true));
    round_trip(Value::Int(0));
    round_trip(Value::Int(23));
    round_trip(Value::Int(24));
    round_trip(Value::Int(-1));
    round_trip(Value::Int(i64::MAX));
    round_trip(Value::Int(i64::MIN));
    round_trip(Value::Float(3.25));
    round_trip(Value::Float(-0.0));
}

#[test]
fn strings_and_bytes() {
    round_trip(Value::Text(String::new()));
    round_trip(Value::Text("operator?:".into()));
    round_trip(Value::Text("π ≈ 3.14159".into()));
    round_trip(Value::Bytes(vec![0, 1, 2, 255]));
    round_trip(Value::Text("x".repeat(300)));
}

#[test]
fn nested_containers() {
    round_trip(Value::Map(vec![
        ("@t".into(), Value::Text("Program".into())),
        (
            "x".into(),
            Value::Array(vec![Value::Int(1), Value::Int(0)]),
        ),
        (
            "r".into(),
            Value::Map(vec![("i".into(), Value::Float(1.5))]),
        ),
    ]));
}

#[test]
fn map_order_is_preserved() {
    let value = Value::Map(vec![
        ("n".into(), Value::Int(1)),
        ("c".into(), Value::Int(2)),
        ("a".into(), Value::Int(3)),
    ]);
    let Value::Map(entries) = decode(&encode(&value)).expect("decoding should succeed") else {
        panic!("decoded value should be a map");
    };
    let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["n", "c", "a"]);
}

#[test]
fn truncated_input_fails() {
    let mut bytes = encode(&Value::Text("hello".into()));
    bytes.pop();
    assert_eq!(decode(&bytes), Err(Error::UnexpectedEof(1)));
}

#[test]
fn trailing_bytes_fail() {
    let mut bytes = encode(&Value::Int(1));
    bytes.push(0);
    assert_eq!(decode(&bytes), Err(Error::TrailingBytes(1)));
}
