// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{promote, Axis, Matrix, Value, ValueKind};
use crate::types::Type;
use cqasm_data_structures::{language::Dialect, span::Span};
use num_complex::Complex64;

fn value(kind: ValueKind) -> Value {
    Value::new(Span { lo: 3, hi: 7 }, kind)
}

#[test]
fn promotion_is_lossless_over_int_range() {
    for i in (-1000..1000).chain([i64::from(i32::MIN), i64::from(i32::MAX)]) {
        let promoted = promote(&value(ValueKind::ConstInt(i)), &Type::Real, Dialect::V1)
            .expect("int should promote to real");
        #[allow(clippy::cast_possible_truncation)]
        match promoted.kind {
            ValueKind::ConstReal(r) => assert_eq!(r as i64, i),
            _ => panic!("promoted value should be a real"),
        }
    }
}

#[test]
fn bool_promotes_to_int() {
    let promoted = promote(&value(ValueKind::ConstBool(true)), &Type::Int, Dialect::V1)
        .expect("bool should promote to int");
    assert_eq!(promoted.kind, ValueKind::ConstInt(1));
    let promoted = promote(&value(ValueKind::ConstBool(false)), &Type::Int, Dialect::V1)
        .expect("bool should promote to int");
    assert_eq!(promoted.kind, ValueKind::ConstInt(0));
}

#[test]
fn promotion_is_transitive() {
    let promoted = promote(&value(ValueKind::ConstBool(true)), &Type::Complex, Dialect::V1)
        .expect("bool should promote to complex");
    assert_eq!(
        promoted.kind,
        ValueKind::ConstComplex(Complex64::new(1.0, 0.0))
    );
}

#[test]
fn no_demotion() {
    assert_eq!(
        promote(&value(ValueKind::ConstReal(1.0)), &Type::Int, Dialect::V1),
        None
    );
    assert_eq!(
        promote(
            &value(ValueKind::ConstComplex(Complex64::new(1.0, 0.0))),
            &Type::Real,
            Dialect::V1
        ),
        None
    );
}

#[test]
fn promotion_keeps_span() {
    let promoted = promote(&value(ValueKind::ConstInt(4)), &Type::Complex, Dialect::V1)
        .expect("int should promote to complex");
    assert_eq!(promoted.span, Span { lo: 3, hi: 7 });
}

#[test]
fn v1_refs_are_scalar_typed_at_any_arity() {
    let refs = value(ValueKind::QubitRefs(vec![0, 1, 2]));
    assert_eq!(refs.type_of(Dialect::V1), Type::Qubit);
    assert!(promote(&refs, &Type::Qubit, Dialect::V1).is_some());
}

#[test]
fn v3_refs_are_typed_by_arity() {
    let one = value(ValueKind::QubitRefs(vec![0]));
    let many = value(ValueKind::QubitRefs(vec![0, 1]));
    assert_eq!(one.type_of(Dialect::V3), Type::Qubit);
    assert_eq!(many.type_of(Dialect::V3), Type::QubitArray(2));
    // A scalar reference wraps into an array of one; an array does not shrink
    // back to a scalar.
    assert!(promote(&one, &Type::QubitArray(1), Dialect::V3).is_some());
    assert!(promote(&many, &Type::Qubit, Dialect::V3).is_none());
    assert!(promote(&many, &Type::QubitArray(1), Dialect::V3).is_some());
}

#[test]
fn bit_refs_promote_like_qubit_refs() {
    let one = value(ValueKind::BitRefs(vec![4]));
    assert_eq!(one.type_of(Dialect::V3), Type::Bit);
    assert!(promote(&one, &Type::BitArray(1), Dialect::V3).is_some());
}

#[test]
fn axis_constants_are_unit_vectors() {
    assert_eq!(Axis::X.to_string(), "[1, 0, 0]");
    assert_eq!(Axis::Y.to_string(), "[0, 1, 0]");
    assert_eq!(Axis::Z.to_string(), "[0, 0, 1]");
}

#[test]
fn matrix_shape() {
    let m = Matrix::new(2, vec![1.0, 0.0, 0.0, 1.0]);
    assert_eq!(m.num_cols(), 2);
    assert_eq!(m.num_rows(), 2);
    assert_eq!(m.to_string(), "[1, 0 | 0, 1]");
}

#[test]
#[should_panic(expected = "matrix data length should be a multiple")]
fn ragged_matrix_panics() {
    let _ = Matrix::new(2, vec![1.0, 2.0, 3.0]);
}
