// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{FunctionTable, InstructionTable, MappingTable, OverloadedNameResolver};
use crate::error::Error;
use cqasm_data_structures::{language::Dialect, span::Span};
use cqasm_semantic::{
    instruction::Instruction,
    types::Type,
    value::{Value, ValueKind},
};

fn int(value: i64) -> Value {
    Value::new(Span::default(), ValueKind::ConstInt(value))
}

fn real(value: f64) -> Value {
    Value::new(Span::default(), ValueKind::ConstReal(value))
}

fn qubits(indices: &[i64]) -> Value {
    Value::new(Span::default(), ValueKind::QubitRefs(indices.to_vec()))
}

fn instruction(name: &str, param_types: Vec<Type>) -> Instruction {
    Instruction::new(name, param_types, true, true, false, false)
}

#[test]
fn unknown_name_fails() {
    let resolver: OverloadedNameResolver<u32> = OverloadedNameResolver::new(Dialect::V1);
    assert!(matches!(
        resolver.resolve("nope", &[], None),
        Err(Error::NameResolution(name, _)) if name == "nope"
    ));
}

#[test]
fn known_name_with_wrong_arity_fails_overload_resolution() {
    let mut resolver = OverloadedNameResolver::new(Dialect::V1);
    resolver.add_overload("wait", 0u32, vec![Type::Qubit, Type::Int]);
    assert!(matches!(
        resolver.resolve("wait", &[int(1)], None),
        Err(Error::OverloadResolution(name, types, _)) if name == "wait" && types == "int"
    ));
}

#[test]
fn latest_registration_wins() {
    let mut resolver = OverloadedNameResolver::new(Dialect::V1);
    resolver.add_overload("f", 1u32, vec![Type::Int]);
    resolver.add_overload("f", 2u32, vec![Type::Int]);
    let (payload, _) = resolver
        .resolve("f", &[int(1)], None)
        .expect("resolution should succeed");
    assert_eq!(payload, 2);
}

#[test]
fn resolution_is_deterministic() {
    let mut resolver = OverloadedNameResolver::new(Dialect::V1);
    resolver.add_overload("f", 1u32, vec![Type::Int]);
    resolver.add_overload("f", 2u32, vec![Type::Real]);
    for _ in 0..10 {
        // An int argument promotes to real, but the int overload is still
        // preferred when it was registered later... it was not, so the real
        // overload wins every time.
        let (payload, _) = resolver
            .resolve("f", &[int(1)], None)
            .expect("resolution should succeed");
        assert_eq!(payload, 2);
    }
}

#[test]
fn arguments_are_promoted_to_parameter_types() {
    let mut resolver = OverloadedNameResolver::new(Dialect::V1);
    resolver.add_overload("f", (), vec![Type::Real]);
    let ((), promoted) = resolver
        .resolve("f", &[int(3)], None)
        .expect("resolution should succeed");
    assert_eq!(promoted[0].kind, ValueKind::ConstReal(3.0));
}

#[test]
fn exact_overload_preferred_over_promotion() {
    let mut resolver = OverloadedNameResolver::new(Dialect::V1);
    resolver.add_overload("f", "real", vec![Type::Real]);
    resolver.add_overload("f", "int", vec![Type::Int]);
    // Reverse insertion order tries the int overload first, which matches
    // without promotion.
    let (payload, _) = resolver
        .resolve("f", &[int(1)], None)
        .expect("resolution should succeed");
    assert_eq!(payload, "int");
    // A real argument skips the int overload.
    let (payload, _) = resolver
        .resolve("f", &[real(1.5)], None)
        .expect("resolution should succeed");
    assert_eq!(payload, "real");
}

#[test]
fn v1_names_are_case_insensitive() {
    let mut table = InstructionTable::new(Dialect::V1);
    table.add(instruction("h", vec![Type::Qubit]));
    let upper = table.resolve("H", &[qubits(&[0])], None);
    let lower = table.resolve("h", &[qubits(&[0])], None);
    let (upper, _) = upper.expect("uppercase lookup should succeed");
    let (lower, _) = lower.expect("lowercase lookup should succeed");
    assert_eq!(upper, lower);
}

#[test]
fn v3_names_are_case_sensitive() {
    let mut table = InstructionTable::new(Dialect::V3);
    table.add(instruction("H", vec![Type::Qubit]));
    assert!(table.resolve("H", &[qubits(&[0])], None).is_ok());
    assert!(matches!(
        table.resolve("h", &[qubits(&[0])], None),
        Err(Error::NameResolution(..))
    ));
}

#[test]
fn mapping_add_replaces() {
    let mut table = MappingTable::new();
    table.add("x", int(1), None);
    table.add("x", int(2), None);
    let resolved = table.resolve("x", None).expect("mapping should resolve");
    assert_eq!(resolved.kind, ValueKind::ConstInt(2));
}

#[test]
fn mapping_resolve_clones() {
    let mut table = MappingTable::new();
    table.add("x", int(1), None);
    let first = table.resolve("x", None).expect("mapping should resolve");
    let second = table.resolve("x", None).expect("mapping should resolve");
    assert_eq!(first, second);
}

#[test]
fn function_call_invokes_implementation() {
    let mut table = FunctionTable::new(Dialect::V1);
    table.add("double", vec![Type::Int], |args| {
        let ValueKind::ConstInt(x) = args[0].kind else {
            panic!("argument should be an int");
        };
        Ok(ValueKind::ConstInt(x * 2))
    });
    let result = table
        .call("double", &[int(21)], Span { lo: 5, hi: 9 })
        .expect("call should succeed");
    assert_eq!(result.kind, ValueKind::ConstInt(42));
    assert_eq!(result.span, Span { lo: 5, hi: 9 });
}
