// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{program_from_value, program_to_value};
use crate::{
    instruction::Instruction as InstructionSig,
    semantic::{
        AnnotationData, Bundle, ErrorModelNode, GateModifier, GateModifierKind, Instruction,
        Mapping, Program, Subcircuit, Variable,
    },
    types::Type,
    value::{Axis, FunctionCall, Matrix, Value, ValueKind},
};
use cqasm_data_structures::{cbor, span::Span, version::Version};
use num_complex::Complex64;
use std::rc::Rc;

fn value(lo: u32, hi: u32, kind: ValueKind) -> Value {
    Value::new(Span { lo, hi }, kind)
}

fn sample_program() -> Program {
    let h = Rc::new(InstructionSig::new(
        "h",
        vec![Type::Qubit],
        true,
        true,
        false,
        false,
    ));
    Program {
        api_version: Version::new(&[1, 0]),
        version: Version::new(&[1, 0]),
        num_qubits: 2,
        num_bits: 2,
        error_model: Some(ErrorModelNode {
            model: Some(Rc::new(crate::instruction::ErrorModel::new(
                "depolarizing_channel",
                vec![Type::Real],
            ))),
            name: "depolarizing_channel".into(),
            operands: vec![value(30, 35, ValueKind::ConstReal(0.001))],
            annotations: Vec::new(),
            span: Span { lo: 12, hi: 35 },
        }),
        subcircuits: vec![Subcircuit {
            name: "default".into(),
            iterations: 1,
            bundles: vec![Bundle {
                instructions: vec![Instruction {
                    instruction: Some(h),
                    name: "h".into(),
                    modifiers: vec![GateModifier {
                        kind: GateModifierKind::Pow(value(40, 41, ValueKind::ConstReal(2.0))),
                        span: Span { lo: 36, hi: 41 },
                    }],
                    condition: Some(value(42, 46, ValueKind::BitRefs(vec![0]))),
                    operands: vec![value(47, 51, ValueKind::QubitRefs(vec![0, 1]))],
                    annotations: vec![AnnotationData {
                        interface: "test".into(),
                        operation: "annot".into(),
                        operands: vec![value(52, 53, ValueKind::ConstString("x".into()))],
                        span: Span { lo: 52, hi: 60 },
                    }],
                    span: Span { lo: 36, hi: 60 },
                }],
                annotations: Vec::new(),
                span: Span { lo: 36, hi: 60 },
            }],
            annotations: Vec::new(),
            span: Span { lo: 36, hi: 60 },
        }],
        mappings: vec![
            Mapping {
                name: "im".into(),
                value: value(0, 0, ValueKind::ConstComplex(Complex64::new(0.0, 1.0))),
                annotations: Vec::new(),
                span: Span { lo: 0, hi: 0 },
            },
            Mapping {
                name: "axes".into(),
                value: value(0, 0, ValueKind::ConstAxis(Axis::Y)),
                annotations: Vec::new(),
                span: Span { lo: 0, hi: 0 },
            },
            Mapping {
                name: "unitary".into(),
                value: value(
                    0,
                    0,
                    ValueKind::ConstComplexMatrix(Matrix::new(
                        2,
                        vec![
                            Complex64::new(1.0, 0.0),
                            Complex64::new(0.0, 0.0),
                            Complex64::new(0.0, 0.0),
                            Complex64::new(0.0, 1.0),
                        ],
                    )),
                ),
                annotations: Vec::new(),
                span: Span { lo: 0, hi: 0 },
            },
            Mapping {
                name: "deferred".into(),
                value: value(
                    0,
                    0,
                    ValueKind::FunctionCall(Box::new(FunctionCall {
                        name: "sqrt".into(),
                        args: vec![value(0, 0, ValueKind::VariableRef("f".into(), Type::Real))],
                        return_type: Type::Real,
                    })),
                ),
                annotations: Vec::new(),
                span: Span { lo: 0, hi: 0 },
            },
        ],
        variables: vec![Variable {
            name: "b".into(),
            ty: Type::BitArray(2),
            annotations: Vec::new(),
            span: Span { lo: 5, hi: 6 },
        }],
        span: Span { lo: 0, hi: 61 },
    }
}

#[test]
fn value_round_trip() {
    let program = sample_program();
    let value = program_to_value(&program);
    assert_eq!(program_from_value(&value), Ok(program));
}

#[test]
fn binary_round_trip() {
    let program = sample_program();
    let bytes = cbor::encode(&program_to_value(&program));
    let value = cbor::decode(&bytes).expect("blob should decode");
    assert_eq!(program_from_value(&value), Ok(program));
}

#[test]
fn empty_program_round_trips() {
    let program = Program::default();
    let value = program_to_value(&program);
    assert_eq!(program_from_value(&value), Ok(program));
}

#[test]
fn descriptor_uses_short_keys() {
    let program = sample_program();
    let value = program_to_value(&program);
    let instruction = value
        .get("sc")
        .and_then(|subcircuits| match subcircuits {
            cbor::Value::Array(items) => items.first(),
            _ => None,
        })
        .and_then(|subcircuit| subcircuit.get("b"))
        .and_then(|bundles| match bundles {
            cbor::Value::Array(items) => items.first(),
            _ => None,
        })
        .and_then(|bundle| bundle.get("i"))
        .and_then(|instructions| match instructions {
            cbor::Value::Array(items) => items.first(),
            _ => None,
        })
        .expect("tree should contain the instruction");
    let descriptor = instruction.get("s").expect("signature should be present");
    for key in ["n", "t", "c", "p", "r", "d"] {
        assert!(descriptor.get(key).is_some(), "missing descriptor key {key}");
    }
}
