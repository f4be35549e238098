// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{register_v1, register_v3};
use crate::{error::Error, resolver::FunctionTable};
use cqasm_data_structures::{language::Dialect, span::Span};
use cqasm_semantic::value::{Value, ValueKind};
use num_complex::Complex64;

fn v1() -> FunctionTable {
    let mut table = FunctionTable::new(Dialect::V1);
    register_v1(&mut table);
    table
}

fn v3() -> FunctionTable {
    let mut table = FunctionTable::new(Dialect::V3);
    register_v3(&mut table);
    table
}

fn int(value: i64) -> Value {
    Value::new(Span::default(), ValueKind::ConstInt(value))
}

fn real(value: f64) -> Value {
    Value::new(Span::default(), ValueKind::ConstReal(value))
}

fn boolean(value: bool) -> Value {
    Value::new(Span::default(), ValueKind::ConstBool(value))
}

fn call(table: &FunctionTable, name: &str, args: &[Value]) -> ValueKind {
    table
        .call(name, args, Span::default())
        .expect("call should succeed")
        .kind
}

#[test]
fn int_addition() {
    assert_eq!(
        call(&v1(), "operator+", &[int(2), int(3)]),
        ValueKind::ConstInt(5)
    );
}

#[test]
fn int_arguments_promote_to_real() {
    // 5 / 2 resolves to real division because the legacy dialect defines `/`
    // over reals and complex numbers only.
    assert_eq!(
        call(&v1(), "operator/", &[int(5), int(2)]),
        ValueKind::ConstReal(2.5)
    );
}

#[test]
fn int_division_truncates_toward_zero() {
    let table = v1();
    assert_eq!(
        call(&table, "operator//", &[int(7), int(2)]),
        ValueKind::ConstInt(3)
    );
    assert_eq!(
        call(&table, "operator//", &[int(-7), int(2)]),
        ValueKind::ConstInt(-3)
    );
}

#[test]
fn modulo_matches_dividend_sign() {
    let table = v1();
    assert_eq!(
        call(&table, "operator%", &[int(7), int(3)]),
        ValueKind::ConstInt(1)
    );
    assert_eq!(
        call(&table, "operator%", &[int(-7), int(3)]),
        ValueKind::ConstInt(-1)
    );
}

#[test]
fn division_by_zero_fails() {
    let table = v1();
    for (name, args) in [
        ("operator//", [int(1), int(0)]),
        ("operator%", [int(1), int(0)]),
        ("operator/", [real(1.0), real(0.0)]),
    ] {
        assert!(
            matches!(
                table.call(name, &args, Span::default()),
                Err(Error::DivisionByZero(_))
            ),
            "{name} should fail on a zero divisor"
        );
    }
}

#[test]
fn shift_operators() {
    let table = v1();
    assert_eq!(
        call(&table, "operator<<", &[int(1), int(4)]),
        ValueKind::ConstInt(16)
    );
    assert_eq!(
        call(&table, "operator>>", &[int(-16), int(2)]),
        ValueKind::ConstInt(-4)
    );
    // Logical right shift fills with zeroes.
    assert_eq!(
        call(&table, "operator>>>", &[int(-1), int(60)]),
        ValueKind::ConstInt(15)
    );
}

#[test]
fn ternary_selects() {
    let table = v1();
    assert_eq!(
        call(&table, "operator?:", &[boolean(true), int(1), int(2)]),
        ValueKind::ConstInt(1)
    );
    assert_eq!(
        call(&table, "operator?:", &[boolean(false), int(1), int(2)]),
        ValueKind::ConstInt(2)
    );
}

#[test]
fn complex_builders() {
    let table = v1();
    let ValueKind::ConstComplex(c) = call(&table, "complex", &[real(1.0), real(2.0)]) else {
        panic!("complex should build a complex number");
    };
    assert_eq!(c, Complex64::new(1.0, 2.0));
    assert_eq!(
        call(&table, "real", &[Value::new(Span::default(), ValueKind::ConstComplex(c))]),
        ValueKind::ConstReal(1.0)
    );
    assert_eq!(
        call(&table, "imag", &[Value::new(Span::default(), ValueKind::ConstComplex(c))]),
        ValueKind::ConstReal(2.0)
    );
    assert_eq!(
        call(&table, "norm", &[Value::new(Span::default(), ValueKind::ConstComplex(c))]),
        ValueKind::ConstReal(5.0)
    );
}

#[test]
fn string_concatenation() {
    let table = v1();
    let lhs = Value::new(Span::default(), ValueKind::ConstString("ab".into()));
    let rhs = Value::new(Span::default(), ValueKind::ConstString("cd".into()));
    assert_eq!(
        call(&table, "operator+", &[lhs, rhs]),
        ValueKind::ConstString("abcd".into())
    );
}

#[test]
fn v3_has_no_legacy_only_operators() {
    let table = v3();
    assert!(matches!(
        table.call("operator>>>", &[int(1), int(1)], Span::default()),
        Err(Error::NameResolution(..))
    ));
    assert!(matches!(
        table.call("operator//", &[int(1), int(1)], Span::default()),
        Err(Error::NameResolution(..))
    ));
}

#[test]
fn v3_int_division_truncates() {
    assert_eq!(
        call(&v3(), "operator/", &[int(-9), int(2)]),
        ValueKind::ConstInt(-4)
    );
}

#[test]
fn sqrt_of_real() {
    assert_eq!(
        call(&v1(), "sqrt", &[real(9.0)]),
        ValueKind::ConstReal(3.0)
    );
}
